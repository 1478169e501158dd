mod bot;
mod owner;
mod trade;

pub use bigdecimal::num_bigint::BigInt;
pub use bot::{Bot, BotStatus, Strategy};
pub use owner::Owner;
pub use trade::{Trade, TradeKey};

use alloy_primitives::{I256, U256};
use bigdecimal::num_bigint::Sign;

/// Widen an on-chain int256 into an arbitrary precision integer
pub fn signed_to_bigint(value: I256) -> BigInt {
    BigInt::from_signed_bytes_be(&value.into_raw().to_be_bytes::<32>())
}

/// Widen an on-chain uint256 into an arbitrary precision integer
pub fn unsigned_to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_to_bigint_keeps_sign() {
        assert_eq!(signed_to_bigint(I256::try_from(-20i64).unwrap()), BigInt::from(-20));
        assert_eq!(signed_to_bigint(I256::try_from(50i64).unwrap()), BigInt::from(50));
        assert_eq!(signed_to_bigint(I256::ZERO), BigInt::from(0));
        assert_eq!(signed_to_bigint(I256::MIN).to_string(), I256::MIN.to_string());
    }

    #[test]
    fn test_unsigned_to_bigint_handles_full_width() {
        assert_eq!(unsigned_to_bigint(U256::MAX).to_string(), U256::MAX.to_string());
        assert_eq!(unsigned_to_bigint(U256::from(7u64)), BigInt::from(7));
    }

    #[test]
    fn test_totals_exceed_int256_without_truncation() {
        let max = signed_to_bigint(I256::MAX);
        let total = &max + &max;
        assert!(total > max);
    }
}
