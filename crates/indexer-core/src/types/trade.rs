use alloy_primitives::{Address, B256, I256, U256};
use bigdecimal::num_bigint::BigInt;
use std::fmt;

use super::signed_to_bigint;

/// Unique key for trade lookup (tx_hash + log_index)
/// A transaction cannot emit two logs at the same index, so replaying a log yields the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TradeKey {
    pub tx_hash: B256,
    pub log_index: u64,
}

impl TradeKey {
    pub fn new(tx_hash: B256, log_index: u64) -> Self {
        Self { tx_hash, log_index }
    }

    /// Entity id in `<txHash>-<logIndex>` form
    pub fn id(&self) -> String {
        format!("{:#x}-{}", self.tx_hash, self.log_index)
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}-{}", self.tx_hash, self.log_index)
    }
}

/// A swap executed by a bot contract. Written once, never updated
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub key: TradeKey,
    /// Emitting bot contract
    pub bot_address: Address,
    /// Block timestamp
    pub timestamp: u64,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub pnl: I256,
    pub block_number: u64,
}

impl Trade {
    pub fn id(&self) -> String {
        self.key.id()
    }

    pub fn pnl_bigint(&self) -> BigInt {
        signed_to_bigint(self.pnl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_id_format() {
        let key = TradeKey::new(B256::repeat_byte(0x11), 7);
        let expected = format!("0x{}-7", "11".repeat(32));
        assert_eq!(key.id(), expected);
        assert_eq!(key.to_string(), expected);
    }

    #[test]
    fn test_trade_keys_differ_by_log_index() {
        let hash = B256::repeat_byte(0x22);
        assert_ne!(TradeKey::new(hash, 0), TradeKey::new(hash, 1));
    }
}
