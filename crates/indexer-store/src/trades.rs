use alloy_primitives::Address;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use indexer_core::types::{Trade, TradeKey};
use std::time::Instant;
use tracing::debug;

/// Thread-safe, append-only store for trades
#[derive(Debug)]
pub struct TradeStore {
    /// TradeKey (tx_hash + log_index) -> Trade
    trades: DashMap<TradeKey, Trade>,

    /// bot address -> Vec<TradeKey> (chronological order)
    bot_trades: DashMap<Address, Vec<TradeKey>>,
}

impl TradeStore {
    pub fn new() -> Self {
        Self {
            trades: DashMap::new(),
            bot_trades: DashMap::new(),
        }
    }

    /// Insert a trade (idempotent - duplicate keys are ignored)
    /// Returns true if trade was inserted, false if it already existed
    pub fn insert(&self, trade: Trade) -> bool {
        let start = Instant::now();
        let key = trade.key;
        let bot_address = trade.bot_address;

        match self.trades.entry(key) {
            Entry::Occupied(_) => {
                debug!(
                    trade = %key,
                    bot = ?bot_address,
                    "Trade already exists (duplicate), skipping insert"
                );
                return false;
            }
            Entry::Vacant(slot) => {
                slot.insert(trade);
            }
        }

        self.bot_trades
            .entry(bot_address)
            .or_insert_with(Vec::new)
            .push(key);

        let duration_us = start.elapsed().as_micros();
        debug!(
            trade = %key,
            bot = ?bot_address,
            total_trades = self.trades.len(),
            total_us = duration_us,
            "Trade stored in memory"
        );
        true
    }

    /// Bulk insert trades (for restoring state from database). Known keys are skipped
    pub fn bulk_insert(&self, trades: impl IntoIterator<Item = Trade>) -> usize {
        let start = Instant::now();
        let mut count = 0;
        for trade in trades {
            let key = trade.key;
            let bot_address = trade.bot_address;
            if let Entry::Vacant(slot) = self.trades.entry(key) {
                slot.insert(trade);
                self.bot_trades.entry(bot_address).or_default().push(key);
                count += 1;
            }
        }
        debug!(
            inserted = count,
            total_trades = self.trades.len(),
            bulk_insert_us = start.elapsed().as_micros(),
            "Bulk inserted trades into memory store"
        );
        count
    }

    /// Get trade by key
    pub fn get(&self, key: &TradeKey) -> Option<Trade> {
        self.trades.get(key).map(|t| t.clone())
    }

    pub fn contains(&self, key: &TradeKey) -> bool {
        self.trades.contains_key(key)
    }

    /// Most recent trades executed by a bot contract
    pub fn get_bot_trades(&self, bot_address: &Address, limit: usize) -> Vec<Trade> {
        self.bot_trades
            .get(bot_address)
            .map(|keys| {
                keys.iter()
                    .rev()
                    .take(limit)
                    .filter_map(|key| self.trades.get(key).map(|t| t.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get total trade count
    pub fn count(&self) -> usize {
        self.trades.len()
    }

    /// Get trade count for a bot contract
    pub fn bot_count(&self, bot_address: &Address) -> usize {
        self.bot_trades
            .get(bot_address)
            .map(|keys| keys.len())
            .unwrap_or(0)
    }
}

impl Default for TradeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, I256, U256};

    fn trade(log_index: u64, bot_address: Address) -> Trade {
        Trade {
            key: TradeKey::new(B256::repeat_byte(0x0f), log_index),
            bot_address,
            timestamp: 1_000 + log_index,
            token_in: Address::repeat_byte(0x10),
            token_out: Address::repeat_byte(0x20),
            amount_in: U256::from(100u64),
            amount_out: U256::from(101u64),
            pnl: I256::ONE,
            block_number: 5,
        }
    }

    #[test]
    fn test_insert_is_idempotent() {
        let store = TradeStore::new();
        let bot = Address::repeat_byte(0x01);

        assert!(store.insert(trade(0, bot)));
        assert!(!store.insert(trade(0, bot)));
        assert_eq!(store.count(), 1);
        assert_eq!(store.bot_count(&bot), 1);
    }

    #[test]
    fn test_bulk_insert_skips_known_keys() {
        let store = TradeStore::new();
        let bot = Address::repeat_byte(0x01);
        store.insert(trade(0, bot));

        let restored = store.bulk_insert(vec![trade(0, bot), trade(1, bot), trade(2, bot)]);
        assert_eq!(restored, 2);
        assert_eq!(store.count(), 3);
        assert_eq!(store.bot_count(&bot), 3);
        assert!(!store.insert(trade(2, bot)));
    }

    #[test]
    fn test_bot_trades_newest_first() {
        let store = TradeStore::new();
        let bot = Address::repeat_byte(0x01);
        for i in 0..5 {
            store.insert(trade(i, bot));
        }
        store.insert(trade(9, Address::repeat_byte(0x02)));

        let recent = store.get_bot_trades(&bot, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].key.log_index, 4);
        assert_eq!(recent[1].key.log_index, 3);
        assert!(store.get_bot_trades(&Address::repeat_byte(0x03), 10).is_empty());
    }
}
