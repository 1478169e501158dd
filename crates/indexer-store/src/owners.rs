use alloy_primitives::Address;
use dashmap::DashMap;
use indexer_core::types::Owner;
use tracing::debug;

/// Thread-safe store for bot owners
#[derive(Debug)]
pub struct OwnerStore {
    owners: DashMap<Address, Owner>,
}

impl OwnerStore {
    pub fn new() -> Self {
        Self {
            owners: DashMap::new(),
        }
    }

    /// Load-or-create the owner and count one more deployment for it
    pub fn record_deployment(&self, address: Address) -> Owner {
        let owner = {
            let mut entry = self
                .owners
                .entry(address)
                .or_insert_with(|| Owner::new(address));
            entry.record_deployment();
            entry.clone()
        };

        debug!(
            owner = ?address,
            bot_count = owner.bot_count,
            total_owners = self.owners.len(),
            "Owner deployment recorded"
        );
        owner
    }

    pub fn get(&self, address: &Address) -> Option<Owner> {
        self.owners.get(address).map(|o| o.clone())
    }

    pub fn get_all(&self) -> Vec<Owner> {
        self.owners.iter().map(|e| e.value().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.owners.len()
    }

    /// Bulk insert owners (for restoring state from database)
    pub fn bulk_insert(&self, owners: impl IntoIterator<Item = Owner>) -> usize {
        let mut count = 0;
        for owner in owners {
            self.owners.insert(owner.address, owner);
            count += 1;
        }
        count
    }
}

impl Default for OwnerStore {
    fn default() -> Self {
        Self::new()
    }
}
