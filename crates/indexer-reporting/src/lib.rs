//! Process-wide error reporting
//!
//! Every report is written to `tracing`. When a Telegram channel is
//! configured, reports at or above `min_forward_severity` are also forwarded,
//! fire-and-forget, on the current tokio runtime. Without `init`, or without a
//! channel, reporting is log-only.

mod config;
mod severity;
mod telegram;

pub use config::ReportingConfig;
pub use severity::Severity;
pub use telegram::TelegramNotifier;

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::error::Error;
use tracing::{debug, error, info, warn};

static REPORTER: OnceCell<ErrorReporter> = OnceCell::new();

/// Installed reporter state
#[derive(Debug)]
pub struct ErrorReporter {
    environment: String,
    min_forward_severity: Severity,
    notifier: Option<TelegramNotifier>,
}

impl ErrorReporter {
    pub fn new(config: ReportingConfig) -> Self {
        let notifier = match (config.telegram_bot_token, config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some(TelegramNotifier::new(token, chat_id)),
            _ => None,
        };

        Self {
            environment: config.environment,
            min_forward_severity: config.min_forward_severity,
            notifier,
        }
    }

    pub fn is_forwarding(&self) -> bool {
        self.notifier.is_some()
    }

    fn forward(&self, severity: Severity, text: String) {
        let Some(notifier) = self.notifier.as_ref() else {
            return;
        };
        if severity < self.min_forward_severity {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let notifier = notifier.clone();
                handle.spawn(async move {
                    notifier.send_message(&text).await;
                });
            }
            Err(_) => debug!("No tokio runtime, report not forwarded"),
        }
    }
}

/// Install the process-wide reporter. Returns false if one was already installed
pub fn init(config: ReportingConfig) -> bool {
    if !config.is_configured() {
        warn!("Error reporting channel not configured, reports will only be logged");
    }

    let reporter = ErrorReporter::new(config);
    let forwarding = reporter.is_forwarding();
    let environment = reporter.environment.clone();

    match REPORTER.set(reporter) {
        Ok(()) => {
            info!(environment = %environment, forwarding, "Error reporting initialized");
            true
        }
        Err(_) => {
            debug!("Error reporting already initialized, ignoring");
            false
        }
    }
}

/// Report an error together with free-form context
pub fn capture_error<E>(err: &E, context: Option<Value>)
where
    E: Error + ?Sized,
{
    let chain = error_chain(err);
    let context_str = context
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_default();

    error!(error = %chain, context = %context_str, "Captured error");

    if let Some(reporter) = REPORTER.get() {
        let text = format_report(
            &reporter.environment,
            Severity::Error,
            &chain,
            context.as_ref(),
        );
        reporter.forward(Severity::Error, text);
    }
}

/// Report a plain message at the given severity
pub fn capture_message(message: &str, severity: Severity) {
    match severity {
        Severity::Debug => debug!(severity = %severity, "{}", message),
        Severity::Info => info!(severity = %severity, "{}", message),
        Severity::Warning => warn!(severity = %severity, "{}", message),
        Severity::Error | Severity::Fatal => error!(severity = %severity, "{}", message),
    }

    if let Some(reporter) = REPORTER.get() {
        let text = format_report(&reporter.environment, severity, message, None);
        reporter.forward(severity, text);
    }
}

/// Render an error and its sources as `outer: inner: root`
pub fn error_chain<E>(err: &E) -> String
where
    E: Error + ?Sized,
{
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// HTML report body as forwarded to the channel
pub fn format_report(
    environment: &str,
    severity: Severity,
    message: &str,
    context: Option<&Value>,
) -> String {
    let mut text = format!(
        "<b>[{}] {}</b>\n{}",
        telegram::escape_html(environment),
        severity.as_str().to_uppercase(),
        telegram::escape_html(message)
    );
    if let Some(context) = context.filter(|c| !c.is_null()) {
        text.push_str("\n<pre>");
        text.push_str(&telegram::escape_html(&context.to_string()));
        text.push_str("</pre>");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(Inner);

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pin failed")
        }
    }

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection reset")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    impl Error for Inner {}

    #[test]
    fn test_error_chain_walks_sources() {
        assert_eq!(error_chain(&Outer(Inner)), "pin failed: connection reset");
    }

    #[test]
    fn test_format_report_includes_context() {
        let text = format_report(
            "production",
            Severity::Error,
            "rpc <timeout>",
            Some(&json!({"block": 12})),
        );
        assert!(text.starts_with("<b>[production] ERROR</b>"));
        assert!(text.contains("rpc &lt;timeout&gt;"));
        assert!(text.contains("<pre>{\"block\":12}</pre>"));
    }

    #[test]
    fn test_format_report_skips_null_context() {
        let text = format_report("dev", Severity::Info, "hello", Some(&Value::Null));
        assert!(!text.contains("<pre>"));
    }

    #[test]
    fn test_reporter_without_channel_is_log_only() {
        let reporter = ErrorReporter::new(ReportingConfig::default());
        assert!(!reporter.is_forwarding());
        // Must not panic without a runtime or channel
        reporter.forward(Severity::Fatal, "ignored".to_string());
    }

    #[test]
    fn test_capture_without_init_does_not_panic() {
        capture_message("uninitialized", Severity::Warning);
        capture_error(&Outer(Inner), Some(json!({"bot": "1"})));
    }
}
