use crate::Severity;
use std::env;

/// Error reporting configuration
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Deployment environment label attached to every report
    pub environment: String,
    /// Telegram bot token from @BotFather
    pub telegram_bot_token: Option<String>,
    /// Chat ID or channel ID that receives reports
    pub telegram_chat_id: Option<String>,
    /// Messages below this severity are logged but not forwarded
    pub min_forward_severity: Severity,
}

impl ReportingConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            telegram_bot_token: env::var("TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.is_empty()),
            telegram_chat_id: env::var("TELEGRAM_CHAT_ID").ok().filter(|s| !s.is_empty()),
            min_forward_severity: env::var("ERROR_REPORT_MIN_SEVERITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Severity::Warning),
        }
    }

    /// Check if a forwarding channel is fully configured
    pub fn is_configured(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            min_forward_severity: Severity::Warning,
        }
    }
}
