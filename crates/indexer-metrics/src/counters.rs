use metrics::{counter, describe_counter};

/// Initialize counter descriptions
pub fn init() {
    describe_counter!(
        "indexer_events_processed_total",
        "Total number of events processed"
    );
    describe_counter!(
        "indexer_blocks_processed_total",
        "Total number of blocks processed"
    );
    describe_counter!(
        "indexer_bots_deployed_total",
        "Total number of BotDeployed events applied"
    );
    describe_counter!(
        "indexer_duplicate_deployments_total",
        "BotDeployed events that reused an indexed token id"
    );
    describe_counter!(
        "indexer_trades_total",
        "Total number of trades indexed"
    );
    describe_counter!(
        "indexer_orphaned_trades_total",
        "Trades emitted by addresses with no indexed bot"
    );
    describe_counter!(
        "indexer_db_writes_total",
        "Total number of database writes"
    );
    describe_counter!(
        "indexer_cache_writes_total",
        "Total number of bot state cache writes"
    );
    describe_counter!(
        "indexer_errors_total",
        "Total number of errors"
    );
}

/// Increment events processed counter
pub fn events_processed(count: u64) {
    counter!("indexer_events_processed_total").increment(count);
}

/// Increment blocks processed counter
pub fn blocks_processed(count: u64) {
    counter!("indexer_blocks_processed_total").increment(count);
}

pub fn bots_deployed(count: u64) {
    counter!("indexer_bots_deployed_total").increment(count);
}

/// Increment duplicate deployments counter, labelled by the policy applied
pub fn duplicate_deployments(count: u64, policy: &str) {
    counter!("indexer_duplicate_deployments_total", "policy" => policy.to_string())
        .increment(count);
}

/// Increment trades counter
pub fn trades_indexed(count: u64) {
    counter!("indexer_trades_total").increment(count);
}

pub fn orphaned_trades(count: u64) {
    counter!("indexer_orphaned_trades_total").increment(count);
}

/// Increment database writes counter
pub fn db_writes(count: u64) {
    counter!("indexer_db_writes_total").increment(count);
}

pub fn cache_writes(count: u64) {
    counter!("indexer_cache_writes_total").increment(count);
}

/// Increment errors counter
pub fn errors(count: u64, error_type: &str) {
    counter!("indexer_errors_total", "type" => error_type.to_string()).increment(count);
}
