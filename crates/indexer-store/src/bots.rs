use alloy_primitives::Address;
use dashmap::DashMap;
use indexer_core::types::Bot;
use std::time::Instant;
use tracing::debug;

/// Thread-safe store for deployed bots
#[derive(Debug)]
pub struct BotStore {
    /// Token id -> Bot
    bots: DashMap<String, Bot>,
    /// Bot contract address -> token id (reverse lookup for trade attribution)
    address_index: DashMap<Address, String>,
}

impl BotStore {
    pub fn new() -> Self {
        Self {
            bots: DashMap::new(),
            address_index: DashMap::new(),
        }
    }

    /// Insert or replace a bot. Returns the record it replaced, if any
    pub fn insert(&self, bot: Bot) -> Option<Bot> {
        let start = Instant::now();
        let id = bot.id.clone();
        let address = bot.address;

        let previous = self.bots.insert(id.clone(), bot);

        // A redeploy under the same id may point at a new contract
        if let Some(prev) = previous.as_ref() {
            if prev.address != address {
                self.address_index.remove_if(&prev.address, |_, indexed| *indexed == id);
            }
        }
        self.address_index.insert(address, id.clone());

        let duration_us = start.elapsed().as_micros();
        debug!(
            bot = %id,
            address = ?address,
            replaced = previous.is_some(),
            total_bots = self.bots.len(),
            insert_us = duration_us,
            "Bot stored in memory"
        );
        previous
    }

    /// Get bot by token id
    pub fn get(&self, id: &str) -> Option<Bot> {
        self.bots.get(id).map(|b| b.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.bots.contains_key(id)
    }

    /// Get token id by bot contract address
    pub fn get_id_by_address(&self, address: &Address) -> Option<String> {
        self.address_index.get(address).map(|id| id.clone())
    }

    /// Get bot by contract address
    pub fn get_by_address(&self, address: &Address) -> Option<Bot> {
        self.get_id_by_address(address).and_then(|id| self.get(&id))
    }

    /// Apply `f` to the bot deployed at `address` and return the updated record
    pub fn update_by_address<F>(&self, address: &Address, f: F) -> Option<Bot>
    where
        F: FnOnce(&mut Bot),
    {
        let id = self.get_id_by_address(address)?;
        let mut entry = self.bots.get_mut(&id)?;
        f(entry.value_mut());
        Some(entry.value().clone())
    }

    /// Check if an address belongs to an indexed bot
    pub fn is_known_bot(&self, address: &Address) -> bool {
        self.address_index.contains_key(address)
    }

    /// All bot contract addresses (for log filtering)
    pub fn get_all_addresses(&self) -> Vec<Address> {
        self.address_index.iter().map(|e| *e.key()).collect()
    }

    /// Bots owned by a wallet
    pub fn get_by_owner(&self, owner: &Address) -> Vec<Bot> {
        self.bots
            .iter()
            .filter(|e| e.value().owner == *owner)
            .map(|e| e.value().clone())
            .collect()
    }

    pub fn get_all(&self) -> Vec<Bot> {
        self.bots.iter().map(|e| e.value().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.bots.len()
    }

    /// Bulk insert bots (for restoring state from database)
    pub fn bulk_insert(&self, bots: impl IntoIterator<Item = Bot>) -> usize {
        let start = Instant::now();
        let mut count = 0;
        for bot in bots {
            self.address_index.insert(bot.address, bot.id.clone());
            self.bots.insert(bot.id.clone(), bot);
            count += 1;
        }
        let duration_us = start.elapsed().as_micros();
        debug!(
            inserted = count,
            total_bots = self.bots.len(),
            bulk_insert_us = duration_us,
            "Bulk inserted bots into memory store"
        );
        count
    }
}

impl Default for BotStore {
    fn default() -> Self {
        Self::new()
    }
}
