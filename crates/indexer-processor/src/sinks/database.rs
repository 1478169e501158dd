use super::traits::{EventSink, SinkEvent};
use async_trait::async_trait;
use indexer_core::{IndexerError, Result};
use indexer_db::models::{DbBot, DbOwner, DbTrade};
use indexer_db::repositories::{BotRepository, OwnerRepository, SyncStateRepository, TradeRepository};
use indexer_db::DatabasePool;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Database sink for PostgreSQL persistence
pub struct DatabaseSink {
    db: Arc<DatabasePool>,
    chain_id: u64,
}

impl DatabaseSink {
    pub fn new(db: Arc<DatabasePool>, chain_id: u64) -> Self {
        Self { db, chain_id }
    }
}

fn db_err(e: impl std::fmt::Display) -> IndexerError {
    IndexerError::Database(e.to_string())
}

#[async_trait]
impl EventSink for DatabaseSink {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn handle_event(&self, event: SinkEvent) -> Result<()> {
        let start = Instant::now();
        let mut tx = self.db.begin().await.map_err(db_err)?;

        match event {
            SinkEvent::BotDeployed { bot, owner } => {
                BotRepository::upsert(&mut *tx, &DbBot::from_bot(self.chain_id, &bot))
                    .await
                    .map_err(db_err)?;
                OwnerRepository::upsert(&mut *tx, &DbOwner::from_owner(self.chain_id, &owner))
                    .await
                    .map_err(db_err)?;
                tx.commit().await.map_err(db_err)?;
                indexer_metrics::counters::db_writes(2);

                debug!(bot = %bot.id, write_us = start.elapsed().as_micros(), "Bot written to database");
            }

            SinkEvent::TradeExecuted { trade, bot } => {
                let inserted =
                    TradeRepository::insert(&mut *tx, &DbTrade::from_trade(self.chain_id, &trade))
                        .await
                        .map_err(db_err)?;
                let mut writes = 1;

                // A row that already existed means the totals were persisted with it
                if inserted {
                    if let Some(bot) = bot.as_ref() {
                        BotRepository::upsert(&mut *tx, &DbBot::from_bot(self.chain_id, bot))
                            .await
                            .map_err(db_err)?;
                        writes += 1;
                    }
                }
                tx.commit().await.map_err(db_err)?;
                indexer_metrics::counters::db_writes(writes);

                debug!(
                    trade = %trade.key,
                    inserted,
                    write_us = start.elapsed().as_micros(),
                    "Trade written to database"
                );
            }
        }

        Ok(())
    }

    async fn checkpoint(&self, block: u64, timestamp: Option<u64>) -> Result<()> {
        SyncStateRepository::set_sync_state(self.db.inner(), self.chain_id as i64, block, timestamp)
            .await
            .map_err(db_err)?;
        debug!(block, "Sync cursor persisted");
        Ok(())
    }
}
