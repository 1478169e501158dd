/// Current sync mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Catching up from the start block to head
    #[default]
    Historical,
    /// At head, polling for new blocks
    Realtime,
}

/// Sync statistics
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    pub total_blocks_processed: u64,
    pub total_events_processed: u64,
    pub bots_deployed: u64,
    pub duplicate_deployments: u64,
    pub trades_indexed: u64,
    /// Trades whose emitter is not an indexed bot
    pub orphaned_trades: u64,
    pub last_block_timestamp: Option<u64>,
}

/// Sync state tracking
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// Last fully synced block number
    pub last_synced_block: u64,

    /// Whether historical sync is complete
    pub historical_sync_complete: bool,

    /// Current sync mode
    pub mode: SyncMode,

    /// Statistics
    pub stats: SyncStats,
}

impl SyncState {
    pub fn new(start_block: u64) -> Self {
        Self {
            last_synced_block: start_block.saturating_sub(1),
            ..Default::default()
        }
    }

    /// Advance the sync cursor over a processed window
    pub fn advance_to(&mut self, block: u64) {
        if block > self.last_synced_block {
            self.stats.total_blocks_processed += block - self.last_synced_block;
            self.last_synced_block = block;
        }
    }

    /// Mark historical sync as complete
    pub fn complete_historical_sync(&mut self) {
        self.historical_sync_complete = true;
        self.mode = SyncMode::Realtime;
    }

    pub fn record_event(&mut self, block_timestamp: u64) {
        self.stats.total_events_processed += 1;
        if block_timestamp > 0 {
            self.stats.last_block_timestamp = Some(block_timestamp);
        }
    }

    pub fn record_bot(&mut self) {
        self.stats.bots_deployed += 1;
    }

    pub fn record_duplicate_deployment(&mut self) {
        self.stats.duplicate_deployments += 1;
    }

    pub fn record_trade(&mut self) {
        self.stats.trades_indexed += 1;
    }

    pub fn record_orphaned_trade(&mut self) {
        self.stats.orphaned_trades += 1;
    }

    /// Get last synced block
    pub fn last_synced_block(&self) -> u64 {
        self.last_synced_block
    }

    /// Check if currently syncing (not in realtime mode)
    pub fn is_syncing(&self) -> bool {
        !matches!(self.mode, SyncMode::Realtime) || !self.historical_sync_complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_blocks_and_never_rewinds() {
        let mut state = SyncState::new(100);
        assert_eq!(state.last_synced_block(), 99);

        state.advance_to(149);
        assert_eq!(state.last_synced_block(), 149);
        assert_eq!(state.stats.total_blocks_processed, 50);

        state.advance_to(120);
        assert_eq!(state.last_synced_block(), 149);
        assert_eq!(state.stats.total_blocks_processed, 50);
    }

    #[test]
    fn test_complete_historical_sync_switches_mode() {
        let mut state = SyncState::default();
        assert!(state.is_syncing());
        state.complete_historical_sync();
        assert!(!state.is_syncing());
        assert_eq!(state.mode, SyncMode::Realtime);
    }
}
