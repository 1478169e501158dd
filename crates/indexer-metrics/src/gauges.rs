use metrics::{describe_gauge, gauge};
use std::sync::atomic::{AtomicU64, Ordering};

// Mirrors of the block gauges, read back by `/health`
static CURRENT_BLOCK: AtomicU64 = AtomicU64::new(0);
static CHAIN_HEAD: AtomicU64 = AtomicU64::new(0);

/// Initialize gauge descriptions
pub fn init() {
    describe_gauge!(
        "indexer_current_block",
        "Current block number being processed"
    );
    describe_gauge!(
        "indexer_chain_head",
        "Latest block reported by the RPC node"
    );
    describe_gauge!("indexer_memory_bots", "Number of bots in memory");
    describe_gauge!("indexer_memory_owners", "Number of owners in memory");
    describe_gauge!("indexer_memory_trades", "Number of trades in memory");
}

/// Set current block gauge
pub fn set_current_block(block: u64) {
    CURRENT_BLOCK.store(block, Ordering::Relaxed);
    gauge!("indexer_current_block").set(block as f64);
}

pub fn set_chain_head(block: u64) {
    CHAIN_HEAD.store(block, Ordering::Relaxed);
    gauge!("indexer_chain_head").set(block as f64);
}

/// Last reported `(current_block, chain_head)`
pub fn sync_progress() -> (u64, u64) {
    (
        CURRENT_BLOCK.load(Ordering::Relaxed),
        CHAIN_HEAD.load(Ordering::Relaxed),
    )
}

pub fn set_memory_bots(count: usize) {
    gauge!("indexer_memory_bots").set(count as f64);
}

pub fn set_memory_owners(count: usize) {
    gauge!("indexer_memory_owners").set(count as f64);
}

/// Set memory trades gauge
pub fn set_memory_trades(count: usize) {
    gauge!("indexer_memory_trades").set(count as f64);
}
