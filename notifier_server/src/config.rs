//! Notifier configuration — loaded from environment variables.

#[derive(Clone, Debug, Default)]
pub struct NotifierConfig {
    /// Trace every request as if it carried `trace=1`.
    pub trace_all: bool,
    /// Chat-bot endpoint that receives outgoing messages. Empty logs them instead.
    pub chat_url: String,
    /// Bearer token for the chat endpoint.
    pub chat_token: String,
    /// Timeout for a single chat delivery, in seconds.
    pub dispatch_timeout_secs: u64,
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        let trace_all = std::env::var("JENKINS_NOTIFIER_TRACE")
            .map(|v| !v.is_empty() && v != "0")
            .unwrap_or(false);
        let chat_url = std::env::var("NOTIFIER_CHAT_URL").unwrap_or_default();
        let chat_token = std::env::var("NOTIFIER_CHAT_TOKEN").unwrap_or_default();
        let dispatch_timeout_secs = std::env::var("NOTIFIER_DISPATCH_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        if chat_url.is_empty() {
            tracing::warn!("NOTIFIER_CHAT_URL not set -- messages will only be logged");
        }

        Self {
            trace_all,
            chat_url,
            chat_token,
            dispatch_timeout_secs,
        }
    }
}
