mod bot;
mod owner;
mod trade;

pub use bot::DbBot;
pub use owner::DbOwner;
pub use trade::DbTrade;

use crate::{DatabaseError, Result};
use alloy_primitives::{Address, B256, I256, U256};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

pub(crate) fn to_decimal(value: BigInt) -> BigDecimal {
    BigDecimal::new(value, 0)
}

pub(crate) fn from_decimal(value: &BigDecimal) -> BigInt {
    value.with_scale(0).into_bigint_and_exponent().0
}

pub(crate) fn u256_from_decimal(column: &str, value: &BigDecimal) -> Result<U256> {
    let digits = from_decimal(value).to_string();
    U256::from_str_radix(&digits, 10)
        .map_err(|e| DatabaseError::Serialization(format!("{}: {} ({})", column, digits, e)))
}

pub(crate) fn i256_from_decimal(column: &str, value: &BigDecimal) -> Result<I256> {
    let digits = from_decimal(value).to_string();
    I256::from_dec_str(&digits)
        .map_err(|e| DatabaseError::Serialization(format!("{}: {} ({})", column, digits, e)))
}

pub(crate) fn parse_hash(column: &str, value: &str) -> Result<B256> {
    value
        .parse()
        .map_err(|e| DatabaseError::Serialization(format!("{}: {} ({})", column, value, e)))
}

pub(crate) fn parse_address(column: &str, value: &str) -> Result<Address> {
    value
        .parse()
        .map_err(|e| DatabaseError::Serialization(format!("{}: {} ({})", column, value, e)))
}

pub(crate) fn hex(address: &Address) -> String {
    format!("{:#x}", address)
}
