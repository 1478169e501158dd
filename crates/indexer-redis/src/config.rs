use indexer_core::ServiceConfig;

/// Default lifetime of cached bot state, in seconds
pub const DEFAULT_TTL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// TTL applied by `BotStateCache::cache_bot_state` when none is given
    pub default_ttl_secs: u64,
}

impl RedisConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            password: None,
            default_ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Host and port come from the shared service config, the password from `REDIS_PASSWORD`.
    /// `None` when no cache host is configured
    pub fn from_env(services: &ServiceConfig) -> Option<Self> {
        let host = services.cache_host.clone()?;
        Some(Self {
            password: std::env::var("REDIS_PASSWORD").ok().filter(|s| !s.is_empty()),
            default_ttl_secs: std::env::var("REDIS_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            ..Self::new(host, services.cache_port)
        })
    }

    /// Connection URL, `redis://[:password@]host:port`
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}", password, self.host, self.port),
            None => format!("redis://{}:{}", self.host, self.port),
        }
    }

    /// URL safe for logs
    pub fn redacted_url(&self) -> String {
        match &self.password {
            Some(_) => format!("redis://:***@{}:{}", self.host, self.port),
            None => self.url(),
        }
    }
}
