use alloy_primitives::Address;
use bigdecimal::num_bigint::BigInt;

/// Wallet that owns one or more bots
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub address: Address,
    pub bot_count: u64,
    pub total_pnl: BigInt,
}

impl Owner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            bot_count: 0,
            total_pnl: BigInt::default(),
        }
    }

    pub fn record_deployment(&mut self) {
        self.bot_count += 1;
    }
}
