use alloy::rpc::types::Log;
use alloy_sol_types::SolEvent;
use indexer_core::events::{BotDeployed, TradeExecuted};
use indexer_core::{IndexerConfig, IndexerError, Result};
use indexer_store::IndexerStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::handlers::{BotDeployedHandler, TradeExecutedHandler};
use crate::sinks::{CompositeSink, SinkEvent};

/// Event processor that routes logs to appropriate handlers
pub struct EventProcessor {
    store: Arc<IndexerStore>,
    config: IndexerConfig,

    bot_deployed: BotDeployedHandler,
    trade_executed: TradeExecutedHandler,

    // Optional sinks for database/cache/pinning
    sinks: Arc<RwLock<CompositeSink>>,
}

impl EventProcessor {
    pub fn new(store: Arc<IndexerStore>, config: IndexerConfig) -> Self {
        Self {
            bot_deployed: BotDeployedHandler::new(store.clone(), config.duplicate_policy),
            trade_executed: TradeExecutedHandler::new(store.clone()),
            store,
            config,
            sinks: Arc::new(RwLock::new(CompositeSink::new())),
        }
    }

    /// Replace the composite sink
    pub async fn set_sinks(&self, sinks: CompositeSink) {
        let mut s = self.sinks.write().await;
        *s = sinks;
    }

    pub fn store(&self) -> &Arc<IndexerStore> {
        &self.store
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Check if a log is from a contract we care about
    pub fn is_relevant_log(&self, log: &Log) -> bool {
        let address = log.address();
        address == self.config.bot_factory || self.store.bots.is_known_bot(&address)
    }

    /// Process a single log, routing to the appropriate handler
    pub async fn process_log(&self, log: Log) -> Result<()> {
        let process_start = Instant::now();

        let topic0 = match log.topics().first() {
            Some(t) => *t,
            None => {
                trace!("Skipping log without topic0");
                return Ok(());
            }
        };

        let block_number = log.block_number.unwrap_or_default();
        let log_index = log.log_index.unwrap_or_default();

        let (event_name, sink_event) = match topic0 {
            sig if sig == BotDeployed::SIGNATURE_HASH => {
                let deployment = self.bot_deployed.handle(&log).await?;
                (
                    "BotDeployed",
                    deployment.map(|d| SinkEvent::BotDeployed {
                        bot: d.bot,
                        owner: d.owner,
                    }),
                )
            }
            sig if sig == TradeExecuted::SIGNATURE_HASH => {
                let executed = self.trade_executed.handle(&log).await?;
                (
                    "TradeExecuted",
                    executed.map(|t| SinkEvent::TradeExecuted {
                        trade: t.trade,
                        bot: t.bot,
                    }),
                )
            }
            _ => {
                trace!(topic0 = ?topic0, address = ?log.address(), "Unknown event signature");
                return Ok(());
            }
        };
        let handler_duration_us = process_start.elapsed().as_micros();

        let sink_start = Instant::now();
        if let Some(event) = sink_event {
            self.emit_to_sinks(event).await;
        }

        indexer_metrics::counters::events_processed(1);
        indexer_metrics::histograms::event_processing_duration(process_start.elapsed(), event_name);

        debug!(
            event = event_name,
            block = block_number,
            log_index = log_index,
            handler_us = handler_duration_us,
            sink_us = sink_start.elapsed().as_micros(),
            "Processed event"
        );
        Ok(())
    }

    /// Emit event to all configured sinks. Failures are reported, never returned
    async fn emit_to_sinks(&self, event: SinkEvent) {
        let sinks = self.sinks.read().await;
        if sinks.is_empty() {
            return;
        }

        let kind = event.kind();
        let bot = event.bot().map(|b| b.id.clone());
        for (sink, error) in sinks.emit(event).await {
            indexer_metrics::counters::errors(1, "sink");
            indexer_reporting::capture_error(
                &error,
                Some(json!({ "sink": sink, "event": kind, "bot": bot })),
            );
        }
    }

    /// Process multiple logs in order. Undecodable logs are reported and skipped
    pub async fn process_logs(&self, logs: Vec<Log>) -> Result<()> {
        for log in logs {
            let block = log.block_number;
            let log_index = log.log_index;
            let address = log.address();

            match self.process_log(log).await {
                Ok(()) => {}
                Err(e @ IndexerError::EventDecode(_)) => {
                    warn!(
                        block = ?block,
                        log_index = ?log_index,
                        address = ?address,
                        error = %e,
                        "Skipping undecodable log"
                    );
                    indexer_metrics::counters::errors(1, "decode");
                    indexer_reporting::capture_error(
                        &e,
                        Some(json!({
                            "block": block,
                            "log_index": log_index,
                            "address": format!("{:#x}", address),
                        })),
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Tell the sinks that every log up to `block` was processed
    pub async fn checkpoint(&self, block: u64) {
        let timestamp = self.store.sync_state.read().await.stats.last_block_timestamp;
        let sinks = self.sinks.read().await;
        for (sink, error) in sinks.checkpoint(block, timestamp).await {
            indexer_metrics::counters::errors(1, "sink");
            indexer_reporting::capture_error(
                &error,
                Some(json!({ "sink": sink, "checkpoint": block })),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::EventSink;
    use alloy_primitives::{Address, Bytes, LogData, B256, I256, U256};
    use async_trait::async_trait;
    use indexer_core::types::BigInt;
    use indexer_core::{DuplicateDeploymentPolicy, IndexerError, ServiceConfig};
    use tokio::sync::Mutex;

    const FACTORY: Address = Address::new([0xfa; 20]);
    const OWNER: Address = Address::new([0xaa; 20]);
    const BOT_A: Address = Address::new([0x0a; 20]);
    const BOT_B: Address = Address::new([0x0b; 20]);

    fn config(policy: DuplicateDeploymentPolicy) -> IndexerConfig {
        let services = ServiceConfig {
            rpc_url: "http://localhost:8545".to_string(),
            ws_url: String::new(),
            api_key: None,
            api_secret: None,
            pinning_base_url: None,
            cache_host: None,
            cache_port: 6379,
        };
        let mut config = IndexerConfig::new(31337, FACTORY, services);
        config.duplicate_policy = policy;
        config
    }

    fn processor(policy: DuplicateDeploymentPolicy) -> EventProcessor {
        EventProcessor::new(Arc::new(IndexerStore::new()), config(policy))
    }

    fn rpc_log(address: Address, data: LogData, block: u64, tx: u8, log_index: u64) -> Log {
        Log {
            inner: alloy_primitives::Log { address, data },
            block_number: Some(block),
            block_timestamp: Some(1_700_000_000 + block * 12),
            transaction_hash: Some(B256::repeat_byte(tx)),
            log_index: Some(log_index),
            ..Default::default()
        }
    }

    fn deployed(token_id: u64, bot: Address, owner: Address, block: u64) -> Log {
        let event = BotDeployed {
            tokenId: U256::from(token_id),
            botAddress: bot,
            owner,
        };
        rpc_log(FACTORY, event.encode_log_data(), block, token_id as u8, 0)
    }

    fn traded(bot: Address, pnl: i64, block: u64, tx: u8, log_index: u64) -> Log {
        let event = TradeExecuted {
            tokenIn: Address::repeat_byte(0x01),
            tokenOut: Address::repeat_byte(0x02),
            amountIn: U256::from(1_000u64),
            amountOut: U256::from(1_050u64),
            pnl: I256::try_from(pnl).unwrap(),
        };
        rpc_log(bot, event.encode_log_data(), block, tx, log_index)
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<SinkEvent>>,
        checkpoints: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl EventSink for RecordingSink {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn handle_event(&self, event: SinkEvent) -> Result<()> {
            self.events.lock().await.push(event);
            Ok(())
        }

        async fn checkpoint(&self, block: u64, _timestamp: Option<u64>) -> Result<()> {
            self.checkpoints.lock().await.push(block);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn handle_event(&self, _event: SinkEvent) -> Result<()> {
            Err(IndexerError::Sink("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_distinct_deployments_create_one_bot_each() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor
            .process_logs(vec![
                deployed(1, BOT_A, OWNER, 10),
                deployed(2, BOT_B, Address::repeat_byte(0xbb), 11),
            ])
            .await
            .unwrap();

        let bots = &processor.store().bots;
        assert_eq!(bots.count(), 2);
        for id in ["1", "2"] {
            let bot = bots.get(id).unwrap();
            assert_eq!(bot.total_trades, 0);
            assert_eq!(bot.total_pnl, BigInt::from(0));
        }
        assert_eq!(bots.get("2").unwrap().address, BOT_B);
    }

    #[tokio::test]
    async fn test_two_deployments_by_one_owner_count_twice() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(deployed(2, BOT_B, OWNER, 11)).await.unwrap();

        let owner = processor.store().owners.get(&OWNER).unwrap();
        assert_eq!(owner.bot_count, 2);
        assert_eq!(owner.total_pnl, BigInt::from(0));
    }

    #[tokio::test]
    async fn test_attributed_trade_updates_bot_totals() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(traded(BOT_A, 50, 12, 0x51, 3)).await.unwrap();

        let bot = processor.store().bots.get("1").unwrap();
        assert_eq!(bot.total_trades, 1);
        assert_eq!(bot.total_pnl, BigInt::from(50));
        assert_eq!(bot.updated_at, 1_700_000_000 + 12 * 12);
        assert_eq!(bot.created_at, 1_700_000_000 + 10 * 12);

        let key = indexer_core::types::TradeKey::new(B256::repeat_byte(0x51), 3);
        let trade = processor.store().trades.get(&key).unwrap();
        assert_eq!(trade.id(), format!("{:#x}-3", B256::repeat_byte(0x51)));
        assert_eq!(trade.bot_address, BOT_A);
    }

    #[tokio::test]
    async fn test_orphaned_trade_is_stored_without_creating_bot() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(traded(BOT_B, 7, 5, 0x61, 0)).await.unwrap();

        let store = processor.store();
        assert_eq!(store.trades.count(), 1);
        assert_eq!(store.bots.count(), 0);
        assert!(!store.bots.is_known_bot(&BOT_B));

        let state = store.sync_state.read().await;
        assert_eq!(state.stats.trades_indexed, 1);
        assert_eq!(state.stats.orphaned_trades, 1);
    }

    #[tokio::test]
    async fn test_every_trade_is_stored_once_per_key() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();

        let logs = vec![
            traded(BOT_A, 5, 11, 0x71, 0),
            traded(BOT_A, 5, 11, 0x71, 1),
            traded(BOT_B, 5, 11, 0x72, 0),
        ];
        processor.process_logs(logs).await.unwrap();

        assert_eq!(processor.store().trades.count(), 3);
        assert_eq!(processor.store().bots.get("1").unwrap().total_trades, 2);
    }

    #[tokio::test]
    async fn test_redelivered_trade_is_not_double_counted() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(traded(BOT_A, 30, 11, 0x81, 2)).await.unwrap();
        processor.process_log(traded(BOT_A, 30, 11, 0x81, 2)).await.unwrap();

        let bot = processor.store().bots.get("1").unwrap();
        assert_eq!(bot.total_trades, 1);
        assert_eq!(bot.total_pnl, BigInt::from(30));
        assert_eq!(processor.store().trades.count(), 1);
    }

    #[tokio::test]
    async fn test_deploy_then_losing_trade_end_to_end() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let sink = Arc::new(RecordingSink::default());
        processor
            .set_sinks(CompositeSink::new().with_sink(sink.clone()))
            .await;

        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();

        let store = processor.store();
        assert_eq!(store.bots.get("1").unwrap().owner, OWNER);
        assert_eq!(store.owners.get(&OWNER).unwrap().bot_count, 1);

        processor.process_log(traded(BOT_A, -20, 11, 0x91, 0)).await.unwrap();

        let bot = store.bots.get("1").unwrap();
        assert_eq!(bot.total_trades, 1);
        assert_eq!(bot.total_pnl, BigInt::from(-20));

        let events = sink.events.lock().await;
        assert_eq!(events.len(), 2);
        match &events[1] {
            SinkEvent::TradeExecuted { trade, bot } => {
                assert_eq!(trade.pnl, I256::try_from(-20i64).unwrap());
                assert_eq!(bot.as_ref().unwrap().total_pnl, BigInt::from(-20));
            }
            other => panic!("unexpected sink event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_deployment_overwrite_replaces_bot() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(traded(BOT_A, 10, 11, 0xa1, 0)).await.unwrap();
        processor.process_log(deployed(1, BOT_B, OWNER, 12)).await.unwrap();

        let store = processor.store();
        let bot = store.bots.get("1").unwrap();
        assert_eq!(bot.address, BOT_B);
        assert_eq!(bot.total_trades, 0);
        assert!(!store.bots.is_known_bot(&BOT_A));
        assert_eq!(store.owners.get(&OWNER).unwrap().bot_count, 2);
        assert_eq!(store.sync_state.read().await.stats.duplicate_deployments, 1);
    }

    #[tokio::test]
    async fn test_duplicate_deployment_reject_keeps_first() {
        let processor = processor(DuplicateDeploymentPolicy::Reject);
        let sink = Arc::new(RecordingSink::default());
        processor
            .set_sinks(CompositeSink::new().with_sink(sink.clone()))
            .await;

        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(deployed(1, BOT_B, OWNER, 12)).await.unwrap();

        let store = processor.store();
        assert_eq!(store.bots.get("1").unwrap().address, BOT_A);
        assert_eq!(store.owners.get(&OWNER).unwrap().bot_count, 1);
        assert_eq!(sink.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_fail_processing() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let recording = Arc::new(RecordingSink::default());
        processor
            .set_sinks(
                CompositeSink::new()
                    .with_sink(Arc::new(FailingSink))
                    .with_sink(recording.clone()),
            )
            .await;

        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();

        assert!(processor.store().bots.contains("1"));
        assert_eq!(recording.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_log_is_an_error() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        // Right signature, missing indexed topics
        let data = LogData::new_unchecked(vec![BotDeployed::SIGNATURE_HASH], Bytes::new());
        let err = processor.process_log(rpc_log(FACTORY, data, 1, 1, 0)).await.unwrap_err();
        assert!(matches!(err, IndexerError::EventDecode(_)));
    }

    #[tokio::test]
    async fn test_malformed_log_does_not_stop_the_batch() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let malformed = rpc_log(
            FACTORY,
            LogData::new_unchecked(vec![BotDeployed::SIGNATURE_HASH], Bytes::new()),
            10,
            0x33,
            1,
        );

        processor
            .process_logs(vec![
                deployed(1, BOT_A, OWNER, 10),
                malformed,
                traded(BOT_A, 12, 11, 0x34, 0),
            ])
            .await
            .unwrap();

        let bot = processor.store().bots.get("1").unwrap();
        assert_eq!(bot.total_trades, 1);
        assert_eq!(bot.total_pnl, BigInt::from(12));
        assert_eq!(processor.store().sync_state.read().await.stats.total_events_processed, 2);
    }

    #[tokio::test]
    async fn test_redelivered_deployment_is_not_counted_again() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let sink = Arc::new(RecordingSink::default());
        processor
            .set_sinks(CompositeSink::new().with_sink(sink.clone()))
            .await;

        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();

        let store = processor.store();
        assert_eq!(store.owners.get(&OWNER).unwrap().bot_count, 1);
        assert_eq!(store.sync_state.read().await.stats.duplicate_deployments, 0);
        assert_eq!(sink.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_replay_over_restored_state_changes_nothing() {
        let window = || {
            vec![
                deployed(1, BOT_A, OWNER, 10),
                traded(BOT_A, 50, 11, 0x41, 0),
            ]
        };

        let first = processor(DuplicateDeploymentPolicy::Overwrite);
        first.process_logs(window()).await.unwrap();

        // Rebuild memory the way startup does from persisted rows
        let restored = Arc::new(IndexerStore::starting_at(10));
        let persisted = first.store();
        restored.bots.bulk_insert(persisted.bots.get_all());
        restored.owners.bulk_insert(persisted.owners.get_all());
        restored
            .trades
            .bulk_insert(persisted.trades.get_bot_trades(&BOT_A, usize::MAX));

        let second = EventProcessor::new(restored, config(DuplicateDeploymentPolicy::Overwrite));
        let sink = Arc::new(RecordingSink::default());
        second
            .set_sinks(CompositeSink::new().with_sink(sink.clone()))
            .await;
        second.process_logs(window()).await.unwrap();

        let store = second.store();
        let bot = store.bots.get("1").unwrap();
        assert_eq!(bot.total_trades, 1);
        assert_eq!(bot.total_pnl, BigInt::from(50));
        assert_eq!(store.owners.get(&OWNER).unwrap().bot_count, 1);
        assert_eq!(store.trades.count(), 1);
        assert!(sink.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkpoint_reaches_sinks() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let sink = Arc::new(RecordingSink::default());
        processor
            .set_sinks(
                CompositeSink::new()
                    .with_sink(Arc::new(FailingSink))
                    .with_sink(sink.clone()),
            )
            .await;

        processor.checkpoint(120).await;
        processor.checkpoint(180).await;
        assert_eq!(*sink.checkpoints.lock().await, vec![120, 180]);
    }

    #[tokio::test]
    async fn test_unknown_signature_is_ignored() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        let data = LogData::new_unchecked(vec![B256::repeat_byte(0xee)], Bytes::new());
        processor.process_log(rpc_log(BOT_A, data, 1, 1, 0)).await.unwrap();

        let state = processor.store().sync_state.read().await;
        assert_eq!(state.stats.total_events_processed, 0);
    }

    #[tokio::test]
    async fn test_relevant_logs_come_from_factory_or_known_bots() {
        let processor = processor(DuplicateDeploymentPolicy::Overwrite);
        assert!(processor.is_relevant_log(&deployed(1, BOT_A, OWNER, 10)));
        assert!(!processor.is_relevant_log(&traded(BOT_A, 1, 11, 1, 0)));

        processor.process_log(deployed(1, BOT_A, OWNER, 10)).await.unwrap();
        assert!(processor.is_relevant_log(&traded(BOT_A, 1, 11, 1, 0)));
    }
}
