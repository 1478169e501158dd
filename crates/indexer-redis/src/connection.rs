use crate::config::RedisConfig;
use crate::{RedisError, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::info;

/// Shared handle to the bot state cache server
#[derive(Clone)]
pub struct RedisConnection {
    manager: ConnectionManager,
    config: RedisConfig,
}

impl RedisConnection {
    /// Connect and keep a self-reconnecting multiplexed connection
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client =
            Client::open(config.url()).map_err(|e| RedisError::Connection(e.to_string()))?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RedisError::Connection(format!("{}: {}", config.redacted_url(), e))
        })?;

        info!(
            url = %config.redacted_url(),
            default_ttl_secs = config.default_ttl_secs,
            "Bot state cache connected"
        );
        Ok(Self { manager, config })
    }

    /// Cheap clone of the managed connection for one command
    pub fn manager(&self) -> ConnectionManager {
        self.manager.clone()
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}
