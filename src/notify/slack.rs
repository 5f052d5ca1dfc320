//! Slack Web API notifier
//!
//! Delivers views through `chat.postMessage` / `chat.update` and error
//! notices through `chat.postEphemeral`. Every call checks the `ok` field
//! of the response envelope; `ok: false` maps the `error` field into
//! [`NotifyError::Api`].

use super::{Notifier, NotifyError};
use crate::view::RenderedView;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

/// Notifier backed by the Slack Web API.
#[derive(Debug)]
pub struct SlackNotifier {
    client: reqwest::Client,
    bot_token: String,
}

impl SlackNotifier {
    /// Create a notifier using `bot_token` (an `xoxb-...` token).
    pub fn new(bot_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build reqwest client");
        Self { client, bot_token: bot_token.into() }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://slack.com/api/{method}")
    }

    /// Call one Web API method and return the response envelope.
    async fn api_request(&self, method: &str, body: Value) -> Result<Value, NotifyError> {
        debug!(method, "slack api request");
        let response = self
            .client
            .post(self.api_url(method))
            .header("Authorization", format!("Bearer {}", self.bot_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| NotifyError::Parse(e.to_string()))?;

        if envelope.get("ok").and_then(Value::as_bool) != Some(true) {
            let message = envelope
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(NotifyError::Api(message.to_string()));
        }

        Ok(envelope)
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post_new(&self, view: &RenderedView) -> Result<String, NotifyError> {
        let body = json!({
            "channel": view.channel,
            "text": view.text,
            "attachments": view.attachments,
        });
        let envelope = self.api_request("chat.postMessage", body).await?;
        envelope
            .get("ts")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| NotifyError::Parse("missing ts in chat.postMessage response".into()))
    }

    async fn update_existing(
        &self,
        message_ref: &str,
        view: &RenderedView,
    ) -> Result<(), NotifyError> {
        let body = json!({
            "ts": message_ref,
            "channel": view.channel,
            "text": view.text,
            "attachments": view.attachments,
        });
        self.api_request("chat.update", body).await.map(|_| ())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), NotifyError> {
        let body = json!({
            "channel": channel,
            "user": user,
            "text": text,
        });
        self.api_request("chat.postEphemeral", body).await.map(|_| ())
    }

    async fn delete_message(&self, channel: &str, message_ref: &str) -> Result<(), NotifyError> {
        let body = json!({
            "channel": channel,
            "ts": message_ref,
        });
        self.api_request("chat.delete", body).await.map(|_| ())
    }
}
