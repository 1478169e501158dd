use alloy::rpc::types::Log;
use alloy_sol_types::SolEvent;
use indexer_core::events::TradeExecuted;
use indexer_core::types::{Bot, Trade, TradeKey};
use indexer_core::{IndexerError, Result};
use indexer_store::IndexerStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// A newly stored trade and the bot it was attributed to
#[derive(Debug, Clone)]
pub struct ExecutedTrade {
    pub trade: Trade,
    /// `None` for orphaned trades
    pub bot: Option<Bot>,
}

pub struct TradeExecutedHandler {
    store: Arc<IndexerStore>,
}

impl TradeExecutedHandler {
    pub fn new(store: Arc<IndexerStore>) -> Self {
        Self { store }
    }

    /// Returns `None` when the trade was already indexed
    pub async fn handle(&self, log: &Log) -> Result<Option<ExecutedTrade>> {
        let event = TradeExecuted::decode_log(&log.inner)
            .map_err(|e| IndexerError::EventDecode(e.to_string()))?;

        let timestamp = log.block_timestamp.unwrap_or_default();
        let trade = Trade {
            key: TradeKey::new(
                log.transaction_hash.unwrap_or_default(),
                log.log_index.unwrap_or_default(),
            ),
            bot_address: log.address(),
            timestamp,
            token_in: event.tokenIn,
            token_out: event.tokenOut,
            amount_in: event.amountIn,
            amount_out: event.amountOut,
            pnl: event.pnl,
            block_number: log.block_number.unwrap_or_default(),
        };

        if !self.store.trades.insert(trade.clone()) {
            debug!(trade = %trade.key, "Trade already indexed, skipping");
            return Ok(None);
        }

        let pnl = trade.pnl_bigint();
        let bot = self
            .store
            .bots
            .update_by_address(&trade.bot_address, |bot| bot.record_trade(&pnl, timestamp));

        {
            let mut state = self.store.sync_state.write().await;
            state.record_trade();
            if bot.is_none() {
                state.record_orphaned_trade();
            }
            state.record_event(timestamp);
        }
        indexer_metrics::counters::trades_indexed(1);

        match bot.as_ref() {
            Some(bot) => debug!(
                trade = %trade.key,
                bot = %bot.id,
                pnl = %pnl,
                total_trades = bot.total_trades,
                total_pnl = %bot.total_pnl,
                "Trade executed"
            ),
            None => {
                indexer_metrics::counters::orphaned_trades(1);
                warn!(
                    trade = %trade.key,
                    emitter = ?trade.bot_address,
                    "Trade from unindexed bot address, stored without attribution"
                );
            }
        }

        Ok(Some(ExecutedTrade { trade, bot }))
    }
}
