//! Telegram transport for forwarded reports

use reqwest::Client;
use tracing::{debug, warn};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Telegram notifier for sending reports
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            chat_id,
        }
    }

    /// Send a message to the configured Telegram chat
    ///
    /// Uses HTML parse mode. Failures are logged, never returned.
    pub async fn send_message(&self, message: &str) {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.bot_token);

        let params = [
            ("chat_id", self.chat_id.as_str()),
            ("text", message),
            ("parse_mode", "HTML"),
        ];

        match self.client.post(&url).form(&params).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Error report forwarded to Telegram");
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "Telegram API returned error");
            }
            Err(e) => {
                warn!(error = %e, "Failed to forward error report to Telegram");
            }
        }
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
