use crate::connection::RedisConnection;
use crate::keys::bot_state_key;
use crate::messages::BotStateMessage;
use crate::{RedisError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// JSON key/value cache with per-entry expiry
#[derive(Clone)]
pub struct BotStateCache {
    connection: Arc<RedisConnection>,
}

impl BotStateCache {
    pub fn new(connection: Arc<RedisConnection>) -> Self {
        Self { connection }
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.connection.config().default_ttl_secs
    }

    /// Store `value` as JSON under `key`, expiring after `ttl_secs`
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) -> Result<()> {
        let payload = encode_entry(value)?;
        let mut conn = self.connection.manager();

        redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(expiry_secs(ttl_secs))
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Cache write failed");
                RedisError::Command(e.to_string())
            })?;

        debug!(key = %key, ttl_secs = expiry_secs(ttl_secs), "Cache entry written");
        Ok(())
    }

    /// Fetch and decode the entry under `key`, `None` if missing or expired
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connection.manager();

        let raw = redis::cmd("GET")
            .arg(key)
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Cache read failed");
                RedisError::Command(e.to_string())
            })?;

        decode_entry(raw.as_deref())
    }

    pub async fn cache_bot_state(
        &self,
        token_id: &str,
        state: &BotStateMessage,
        ttl_secs: Option<u64>,
    ) -> Result<()> {
        let ttl = ttl_secs.unwrap_or_else(|| self.default_ttl_secs());
        self.put(&bot_state_key(token_id), state, ttl).await
    }

    pub async fn bot_state(&self, token_id: &str) -> Result<Option<BotStateMessage>> {
        self.get(&bot_state_key(token_id)).await
    }
}

/// `SET EX` rejects a zero expiry, so entries live at least one second
fn expiry_secs(ttl_secs: u64) -> u64 {
    ttl_secs.max(1)
}

fn encode_entry<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn decode_entry<T: DeserializeOwned>(raw: Option<&str>) -> Result<Option<T>> {
    raw.map(serde_json::from_str::<T>).transpose().map_err(RedisError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use indexer_core::types::Bot;

    fn state() -> BotStateMessage {
        let bot = Bot::deployed(
            U256::from(7u64),
            Address::repeat_byte(0x0b),
            Address::repeat_byte(0xaa),
            1_700_000_000,
        );
        BotStateMessage::from(&bot)
    }

    #[test]
    fn test_expiry_has_a_one_second_floor() {
        assert_eq!(expiry_secs(0), 1);
        assert_eq!(expiry_secs(1), 1);
        assert_eq!(expiry_secs(60), 60);
    }

    #[test]
    fn test_entry_survives_encode_and_decode() {
        let payload = encode_entry(&state()).unwrap();
        let decoded: Option<BotStateMessage> = decode_entry(Some(&payload)).unwrap();
        assert_eq!(decoded.unwrap(), state());
    }

    #[test]
    fn test_missing_entry_decodes_to_none() {
        let decoded: Option<BotStateMessage> = decode_entry(None).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_serialization_error() {
        let err = decode_entry::<BotStateMessage>(Some("{not json")).unwrap_err();
        assert!(matches!(err, RedisError::Serialization(_)));
    }
}
