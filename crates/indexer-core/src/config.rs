use crate::error::{IndexerError, Result};
use alloy_primitives::Address;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Deployment configuration loaded from JSON file
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    #[serde(rename = "BOT_FACTORY")]
    pub bot_factory: Address,
    #[serde(rename = "startBlock")]
    pub start_block: u64,
}

/// Endpoints and credentials for the external services the backend talks to.
///
/// Built once at startup and handed to each client constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// JSON-RPC HTTP endpoint
    pub rpc_url: String,
    /// JSON-RPC WebSocket endpoint
    pub ws_url: String,
    /// Pinning service API key
    pub api_key: Option<String>,
    /// Pinning service API secret
    pub api_secret: Option<String>,
    /// Pinning service base URL override
    pub pinning_base_url: Option<String>,
    /// Cache host, `None` when the cache is not configured
    pub cache_host: Option<String>,
    /// Cache port
    pub cache_port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let rpc_url = sanitize_url(
            &env::var("RPC_URL").map_err(|_| IndexerError::MissingEnvVar("RPC_URL".to_string()))?,
        );

        // WebSocket endpoint is only handed to UI consumers, so it may be absent
        let ws_url = env::var("WS_URL")
            .map(|url| sanitize_url(&url))
            .unwrap_or_default();

        let cache_port = match env::var("REDIS_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|e| IndexerError::InvalidConfig {
                key: "REDIS_PORT".to_string(),
                reason: e.to_string(),
            })?,
            Err(_) => default_cache_port(),
        };

        info!(rpc_url = %rpc_url, ws_url = %ws_url, "Service endpoints loaded");

        Ok(Self {
            rpc_url,
            ws_url,
            api_key: env::var("PINATA_API_KEY").ok().filter(|s| !s.is_empty()),
            api_secret: env::var("PINATA_API_SECRET").ok().filter(|s| !s.is_empty()),
            pinning_base_url: env::var("PINATA_BASE_URL")
                .ok()
                .map(|url| sanitize_url(&url))
                .filter(|url| !url.is_empty()),
            cache_host: env::var("REDIS_HOST").ok().filter(|s| !s.is_empty()),
            cache_port,
        })
    }

    /// Pinning credentials, if both halves are present
    pub fn pinning_credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

fn default_cache_port() -> u16 {
    6379
}

/// Log polling configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Blocks per eth_getLogs window
    pub batch_size: u64,
    /// Delay between head polls once caught up
    pub poll_interval_ms: u64,
    /// Blocks to stay behind head
    pub confirmations: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let batch_size = env::var("SYNC_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|size: &u64| *size > 0)
            .unwrap_or(2000);

        let poll_interval_ms = env::var("SYNC_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        let confirmations = env::var("SYNC_CONFIRMATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let retry_attempts = env::var("SYNC_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let retry_delay_ms = env::var("SYNC_RETRY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        Self {
            batch_size,
            poll_interval_ms,
            confirmations,
            retry_attempts,
            retry_delay_ms,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: 2000,
            poll_interval_ms: 2000,
            confirmations: 0,
            retry_attempts: 10,
            retry_delay_ms: 1000,
        }
    }
}

/// What to do when a `BotDeployed` event reuses a token id that is already indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateDeploymentPolicy {
    /// Replace the stored bot with a fresh record and count the deployment for the owner
    #[default]
    Overwrite,
    /// Keep the first record and leave the owner untouched
    Reject,
}

impl FromStr for DuplicateDeploymentPolicy {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "reject" => Ok(Self::Reject),
            other => Err(IndexerError::InvalidConfig {
                key: "DUPLICATE_DEPLOYMENT_POLICY".to_string(),
                reason: format!("expected 'overwrite' or 'reject', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for DuplicateDeploymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Complete indexer configuration
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub chain_id: u64,
    /// Factory contract emitting `BotDeployed`
    pub bot_factory: Address,
    pub start_block: u64,
    pub services: ServiceConfig,
    pub sync: SyncConfig,
    pub duplicate_policy: DuplicateDeploymentPolicy,
}

impl IndexerConfig {
    /// Minimal config for a factory, used when wiring the processor without a deployment file
    pub fn new(chain_id: u64, bot_factory: Address, services: ServiceConfig) -> Self {
        Self {
            chain_id,
            bot_factory,
            start_block: 0,
            services,
            sync: SyncConfig::default(),
            duplicate_policy: DuplicateDeploymentPolicy::default(),
        }
    }

    /// Load complete configuration from environment and deployment file
    pub fn load() -> Result<Self> {
        let chain_id = env::var("CHAIN_ID")
            .map_err(|_| IndexerError::MissingEnvVar("CHAIN_ID".to_string()))?
            .parse::<u64>()
            .map_err(|_| IndexerError::MissingEnvVar("CHAIN_ID (invalid format)".to_string()))?;

        let services = ServiceConfig::from_env()?;
        let deployment = DeploymentConfig::load(chain_id)?;

        let duplicate_policy = match env::var("DUPLICATE_DEPLOYMENT_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => DuplicateDeploymentPolicy::default(),
        };

        Ok(Self {
            chain_id,
            bot_factory: deployment.bot_factory,
            start_block: deployment.start_block,
            services,
            sync: SyncConfig::from_env(),
            duplicate_policy,
        })
    }
}

impl DeploymentConfig {
    /// Load deployment configuration from JSON file
    pub fn load(chain_id: u64) -> Result<Self> {
        let path = Self::deployment_path(chain_id);
        let content = fs::read_to_string(&path)
            .map_err(|_| IndexerError::DeploymentFileNotFound(path.display().to_string()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| IndexerError::DeploymentParseError(e.to_string()))
    }

    fn deployment_path(chain_id: u64) -> PathBuf {
        PathBuf::from(format!("deployments/{}.json", chain_id))
    }
}

/// Strip surrounding whitespace and one pair of matching quotes
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_quotes = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    without_quotes.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> ServiceConfig {
        ServiceConfig {
            rpc_url: "http://localhost:8545".to_string(),
            ws_url: String::new(),
            api_key: Some("key".to_string()),
            api_secret: None,
            pinning_base_url: None,
            cache_host: None,
            cache_port: default_cache_port(),
        }
    }

    #[test]
    fn test_sanitize_url_strips_quotes() {
        assert_eq!(sanitize_url("  \"https://rpc.example\" "), "https://rpc.example");
        assert_eq!(sanitize_url("'wss://ws.example'"), "wss://ws.example");
        assert_eq!(sanitize_url("https://plain"), "https://plain");
        assert_eq!(sanitize_url("\""), "\"");
    }

    #[test]
    fn test_deployment_config_parses() {
        let json = r#"{
            "BOT_FACTORY": "0x00000000000000000000000000000000000000fa",
            "startBlock": 1234
        }"#;
        let deployment = DeploymentConfig::from_json(json).unwrap();
        assert_eq!(deployment.start_block, 1234);
        assert_eq!(
            deployment.bot_factory,
            "0x00000000000000000000000000000000000000fa".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn test_deployment_config_rejects_missing_factory() {
        let err = DeploymentConfig::from_json(r#"{"startBlock": 1}"#).unwrap_err();
        assert!(matches!(err, IndexerError::DeploymentParseError(_)));
    }

    #[test]
    fn test_duplicate_policy_parsing() {
        assert_eq!(
            "Overwrite".parse::<DuplicateDeploymentPolicy>().unwrap(),
            DuplicateDeploymentPolicy::Overwrite
        );
        assert_eq!(
            " reject ".parse::<DuplicateDeploymentPolicy>().unwrap(),
            DuplicateDeploymentPolicy::Reject
        );
        assert!("merge".parse::<DuplicateDeploymentPolicy>().is_err());
        assert_eq!(DuplicateDeploymentPolicy::default().to_string(), "overwrite");
    }

    #[test]
    fn test_pinning_credentials_need_both_halves() {
        let mut config = services();
        assert!(config.pinning_credentials().is_none());

        config.api_secret = Some("secret".to_string());
        assert_eq!(config.pinning_credentials(), Some(("key", "secret")));
    }

    #[test]
    fn test_indexer_config_new_uses_defaults() {
        let config = IndexerConfig::new(11155111, Address::ZERO, services());
        assert_eq!(config.start_block, 0);
        assert_eq!(config.sync.batch_size, 2000);
        assert_eq!(config.duplicate_policy, DuplicateDeploymentPolicy::Overwrite);
    }
}
