use alloy::rpc::types::Log;
use alloy_sol_types::SolEvent;
use indexer_core::events::BotDeployed;
use indexer_core::types::{Bot, Owner};
use indexer_core::{DuplicateDeploymentPolicy, IndexerError, Result};
use indexer_store::IndexerStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Snapshots produced by an applied deployment
#[derive(Debug, Clone)]
pub struct Deployment {
    pub bot: Bot,
    pub owner: Owner,
    /// The token id was already indexed and the record was replaced
    pub replaced: bool,
}

pub struct BotDeployedHandler {
    store: Arc<IndexerStore>,
    policy: DuplicateDeploymentPolicy,
}

impl BotDeployedHandler {
    pub fn new(store: Arc<IndexerStore>, policy: DuplicateDeploymentPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns `None` when the deployment was already indexed or rejected as a duplicate
    pub async fn handle(&self, log: &Log) -> Result<Option<Deployment>> {
        let event = BotDeployed::decode_log(&log.inner)
            .map_err(|e| IndexerError::EventDecode(e.to_string()))?;

        let timestamp = log.block_timestamp.unwrap_or_default();
        let bot = Bot::deployed(event.tokenId, event.botAddress, event.owner, timestamp);

        let existing = self.store.bots.get(&bot.id);
        if existing
            .as_ref()
            .is_some_and(|known| known.address == bot.address && known.created_at == bot.created_at)
        {
            debug!(bot = %bot.id, address = ?bot.address, "Deployment already indexed, skipping");
            return Ok(None);
        }

        let duplicate = existing.is_some();
        if duplicate {
            indexer_metrics::counters::duplicate_deployments(1, &self.policy.to_string());
            self.store.sync_state.write().await.record_duplicate_deployment();

            if self.policy == DuplicateDeploymentPolicy::Reject {
                warn!(
                    bot = %bot.id,
                    address = ?bot.address,
                    owner = ?bot.owner,
                    "Duplicate deployment rejected, keeping existing bot"
                );
                self.store.sync_state.write().await.record_event(timestamp);
                return Ok(None);
            }

            warn!(bot = %bot.id, address = ?bot.address, "Duplicate deployment, replacing existing bot");
        }

        self.store.bots.insert(bot.clone());
        let owner = self.store.owners.record_deployment(bot.owner);

        info!(
            bot = %bot.id,
            address = ?bot.address,
            owner = ?owner.address,
            owner_bots = owner.bot_count,
            "Bot deployed"
        );

        {
            let mut state = self.store.sync_state.write().await;
            state.record_bot();
            state.record_event(timestamp);
        }
        indexer_metrics::counters::bots_deployed(1);

        Ok(Some(Deployment {
            bot,
            owner,
            replaced: duplicate,
        }))
    }
}
