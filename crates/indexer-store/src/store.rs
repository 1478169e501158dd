use std::sync::Arc;
use tokio::sync::RwLock;

use crate::bots::BotStore;
use crate::owners::OwnerStore;
use crate::sync_state::SyncState;
use crate::trades::TradeStore;

/// Thread-safe in-memory entity store for the indexer
#[derive(Debug)]
pub struct IndexerStore {
    pub bots: Arc<BotStore>,
    pub owners: Arc<OwnerStore>,
    pub trades: Arc<TradeStore>,
    pub sync_state: Arc<RwLock<SyncState>>,
}

impl IndexerStore {
    pub fn new() -> Self {
        Self::with_sync_state(SyncState::default())
    }

    /// Store whose sync cursor sits just before `start_block`
    pub fn starting_at(start_block: u64) -> Self {
        Self::with_sync_state(SyncState::new(start_block))
    }

    fn with_sync_state(state: SyncState) -> Self {
        Self {
            bots: Arc::new(BotStore::new()),
            owners: Arc::new(OwnerStore::new()),
            trades: Arc::new(TradeStore::new()),
            sync_state: Arc::new(RwLock::new(state)),
        }
    }
}

impl Default for IndexerStore {
    fn default() -> Self {
        Self::new()
    }
}
