use indexer_core::ServiceConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.pinata.cloud";

#[derive(Debug, Clone)]
pub struct PinningConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl PinningConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// `None` unless both the key and the secret are configured
    pub fn from_services(services: &ServiceConfig) -> Option<Self> {
        let (key, secret) = services.pinning_credentials()?;
        let base_url = services
            .pinning_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Some(Self {
            base_url,
            ..Self::new(key, secret)
        })
    }

    pub fn pin_json_url(&self) -> String {
        format!("{}/pinning/pinJSONToIPFS", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services(api_secret: Option<&str>, base_url: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            rpc_url: "http://localhost:8545".to_string(),
            ws_url: String::new(),
            api_key: Some("key".to_string()),
            api_secret: api_secret.map(str::to_string),
            pinning_base_url: base_url.map(str::to_string),
            cache_host: None,
            cache_port: 6379,
        }
    }

    #[test]
    fn test_from_services_needs_credentials() {
        assert!(PinningConfig::from_services(&services(None, None)).is_none());

        let config = PinningConfig::from_services(&services(Some("secret"), None)).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_secret, "secret");
    }

    #[test]
    fn test_from_services_uses_base_url_override() {
        let config =
            PinningConfig::from_services(&services(Some("secret"), Some("http://pin.local"))).unwrap();
        assert_eq!(config.pin_json_url(), "http://pin.local/pinning/pinJSONToIPFS");
    }

    #[test]
    fn test_pin_json_url() {
        let mut config = PinningConfig::new("k", "s");
        assert_eq!(config.pin_json_url(), "https://api.pinata.cloud/pinning/pinJSONToIPFS");

        config.base_url = "http://localhost:3000/".to_string();
        assert_eq!(config.pin_json_url(), "http://localhost:3000/pinning/pinJSONToIPFS");
    }
}
