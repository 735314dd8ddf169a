//! Chat delivery — hands finished messages to whatever talks to the chat network.

use std::time::Duration;

use async_trait::async_trait;

use crate::models::policy::Envelope;

/// Delivers one message to one destination.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn send(&self, envelope: &Envelope, message: &str) -> anyhow::Result<()>;
}

/// Writes messages to the log. Used when no chat endpoint is configured.
#[derive(Debug, Default)]
pub struct LogDispatcher;

#[async_trait]
impl Dispatcher for LogDispatcher {
    async fn send(&self, envelope: &Envelope, message: &str) -> anyhow::Result<()> {
        tracing::info!(
            room = envelope.room.as_deref().unwrap_or_default(),
            user = envelope.user.user.as_deref().unwrap_or_default(),
            "{message}"
        );
        Ok(())
    }
}

/// Posts `{ "envelope": ..., "message": ... }` to a chat-bot webhook.
#[derive(Debug, Clone)]
pub struct ChatWebhookDispatcher {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl ChatWebhookDispatcher {
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jenkins-notifier/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl Dispatcher for ChatWebhookDispatcher {
    async fn send(&self, envelope: &Envelope, message: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "envelope": envelope,
            "message": message,
        });

        let mut request = self.client.post(&self.url).json(&body);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let resp = request.send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("chat webhook returned {status}: {text}");
        }

        Ok(())
    }
}
