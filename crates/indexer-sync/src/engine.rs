use alloy::rpc::types::{Filter, Log};
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use futures::future::try_join_all;
use indexer_core::events::{BotDeployed, TradeExecuted};
use indexer_core::{IndexerConfig, Result};
use indexer_processor::EventProcessor;
use indexer_store::IndexerStore;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::select;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::provider::ProviderManager;

/// Bot addresses per `eth_getLogs` filter
const ADDRESS_CHUNK: usize = 500;

/// Upper bound for the retry backoff
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Polls the chain in block windows and feeds logs to the processor in canonical order
pub struct SyncEngine {
    config: IndexerConfig,
    provider: Arc<ProviderManager>,
    store: Arc<IndexerStore>,
    processor: Arc<EventProcessor>,
    /// Shared shutdown flag for graceful termination
    shutdown_flag: Arc<AtomicBool>,
}

impl SyncEngine {
    pub fn new(config: IndexerConfig, store: Arc<IndexerStore>) -> Result<Self> {
        let provider = Arc::new(ProviderManager::from_config(&config.services)?);
        Ok(Self::with_provider(config, store, provider))
    }

    pub fn with_provider(
        config: IndexerConfig,
        store: Arc<IndexerStore>,
        provider: Arc<ProviderManager>,
    ) -> Self {
        let processor = Arc::new(EventProcessor::new(store.clone(), config.clone()));
        Self {
            config,
            provider,
            store,
            processor,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Arc<IndexerStore> {
        &self.store
    }

    pub fn processor(&self) -> &Arc<EventProcessor> {
        &self.processor
    }

    pub fn provider(&self) -> &Arc<ProviderManager> {
        &self.provider
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Relaxed)
    }

    /// Run until the shutdown signal fires or an RPC call exhausts its retries
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let shutdown_flag = Arc::clone(&self.shutdown_flag);
        let mut shutdown_listener = shutdown.resubscribe();
        tokio::spawn(async move {
            let _ = shutdown_listener.recv().await;
            shutdown_flag.store(true, Ordering::SeqCst);
            info!("Shutdown flag set");
        });

        let mut next_block = {
            let state = self.store.sync_state.read().await;
            first_block(state.last_synced_block, self.config.start_block)
        };

        info!(
            from = next_block,
            factory = ?self.config.bot_factory,
            batch_size = self.config.sync.batch_size,
            "Starting sync"
        );

        let poll_interval = Duration::from_millis(self.config.sync.poll_interval_ms);

        while !self.is_shutdown() {
            let head = self
                .with_retry("eth_blockNumber", || self.provider.block_number())
                .await?;
            indexer_metrics::gauges::set_chain_head(head);
            let target = head.saturating_sub(self.config.sync.confirmations);

            if next_block > target {
                self.mark_caught_up(target).await;
                select! {
                    _ = shutdown.recv() => break,
                    _ = tokio::time::sleep(poll_interval) => continue,
                }
            }

            let to = window_end(next_block, target, self.config.sync.batch_size);
            self.sync_window(next_block, to).await?;
            next_block = to + 1;
        }

        info!("Sync engine shutdown complete");
        Ok(())
    }

    async fn mark_caught_up(&self, target: u64) {
        let mut state = self.store.sync_state.write().await;
        if state.historical_sync_complete {
            return;
        }
        state.complete_historical_sync();
        info!(
            head = target,
            bots = self.store.bots.count(),
            trades = self.store.trades.count(),
            events = state.stats.total_events_processed,
            "Historical sync complete, switching to real-time polling"
        );
    }

    /// Fetch, order and process every relevant log in `[from, to]`
    pub async fn sync_window(&self, from: u64, to: u64) -> Result<()> {
        let window_start = Instant::now();

        let factory_filter = Filter::new()
            .address(self.config.bot_factory)
            .event_signature(BotDeployed::SIGNATURE_HASH)
            .from_block(from)
            .to_block(to);
        let mut logs = self
            .with_retry("eth_getLogs", || self.provider.logs(&factory_filter))
            .await?;

        // Bots deployed inside this window can trade inside it too
        let mut addresses: BTreeSet<Address> =
            self.store.bots.get_all_addresses().into_iter().collect();
        addresses.extend(deployed_bot_addresses(&logs));

        if !addresses.is_empty() {
            let addresses: Vec<Address> = addresses.into_iter().collect();
            let filters: Vec<Filter> = addresses
                .chunks(ADDRESS_CHUNK)
                .map(|chunk| {
                    Filter::new()
                        .address(chunk.to_vec())
                        .event_signature(TradeExecuted::SIGNATURE_HASH)
                        .from_block(from)
                        .to_block(to)
                })
                .collect();

            let trade_logs = try_join_all(
                filters
                    .iter()
                    .map(|filter| self.with_retry("eth_getLogs", move || self.provider.logs(filter))),
            )
            .await?;
            logs.extend(trade_logs.into_iter().flatten());
        }

        sort_canonical(&mut logs);
        self.fill_timestamps(&mut logs).await?;

        let event_count = logs.len();
        self.processor.process_logs(logs).await?;

        {
            let mut state = self.store.sync_state.write().await;
            state.advance_to(to);
        }
        self.processor.checkpoint(to).await;
        indexer_metrics::gauges::set_current_block(to);
        indexer_metrics::counters::blocks_processed(to - from + 1);
        indexer_metrics::histograms::batch_processing_duration(window_start.elapsed());

        if event_count > 0 {
            info!(
                from = from,
                to = to,
                events = event_count,
                process_ms = window_start.elapsed().as_millis(),
                bots = self.store.bots.count(),
                trades = self.store.trades.count(),
                "Processed window"
            );
        } else {
            debug!(from = from, to = to, "Empty window");
        }

        Ok(())
    }

    /// Some nodes omit `blockTimestamp` on logs, fetch it from the header instead
    async fn fill_timestamps(&self, logs: &mut [Log]) -> Result<()> {
        let mut timestamps: HashMap<u64, u64> = HashMap::new();

        for log in logs.iter_mut() {
            if log.block_timestamp.is_some() {
                continue;
            }
            let Some(number) = log.block_number else {
                continue;
            };

            let timestamp = match timestamps.get(&number) {
                Some(ts) => *ts,
                None => {
                    let ts = self
                        .with_retry("eth_getBlockByNumber", || self.provider.block_timestamp(number))
                        .await?
                        .unwrap_or_default();
                    timestamps.insert(number, ts);
                    ts
                }
            };
            log.block_timestamp = Some(timestamp);
        }
        Ok(())
    }

    /// Retry an RPC call with exponential backoff, reporting the final failure
    async fn with_retry<T, F, Fut>(&self, method: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.config.sync.retry_attempts.max(1);
        let mut delay = Duration::from_millis(self.config.sync.retry_delay_ms);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match op().await {
                Ok(value) => {
                    if attempts > 1 {
                        info!(method = %method, attempts = attempts, "RPC call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if attempts < max_attempts && !self.is_shutdown() => {
                    warn!(
                        method = %method,
                        attempt = attempts,
                        max_retries = max_attempts,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "RPC call failed, retrying with backoff"
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!(method = %method, attempts = attempts, error = %e, "RPC call failed after max retries");
                    indexer_reporting::capture_error(
                        &e,
                        Some(json!({ "method": method, "attempts": attempts })),
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// First block to fetch given the persisted cursor and the deployment start
fn first_block(last_synced: u64, start_block: u64) -> u64 {
    if last_synced == 0 {
        start_block
    } else {
        (last_synced + 1).max(start_block)
    }
}

fn window_end(from: u64, target: u64, batch_size: u64) -> u64 {
    from.saturating_add(batch_size.max(1) - 1).min(target)
}

fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_RETRY_DELAY)
}

/// Sort by (block_number, log_index)
fn sort_canonical(logs: &mut [Log]) {
    logs.sort_by_key(|log| (log.block_number.unwrap_or(0), log.log_index.unwrap_or(0)));
}

fn deployed_bot_addresses(logs: &[Log]) -> Vec<Address> {
    logs.iter()
        .filter_map(|log| BotDeployed::decode_log(&log.inner).ok())
        .map(|event| event.botAddress)
        .collect()
}
