//! Inbound request bodies
//!
//! Typed forms for the slash-command endpoint and the interactive-action
//! endpoint. Slack posts both as urlencoded forms; the action form wraps
//! its JSON in a single `payload` field.

use serde::Deserialize;

/// Body of a slash-command request (`POST /post`).
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    /// Shared-secret verification token.
    #[serde(default)]
    pub token: String,
    pub user_id: String,
    pub channel_id: String,
    /// Raw command text after the slash command itself.
    #[serde(default)]
    pub text: String,
}

/// Body of an interactive-action request (`POST /actions`).
#[derive(Debug, Clone, Deserialize)]
pub struct ActionsBody {
    /// JSON-encoded [`InteractivePayload`].
    pub payload: String,
}

/// The interactive payload Slack round-trips for button presses.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractivePayload {
    /// Invoked actions; exactly one is consumed.
    #[serde(default)]
    pub actions: Vec<ActionInvocation>,
    /// Callback identifier carrying the poll id.
    pub callback_id: String,
    pub user: SlackUser,
    pub channel: SlackChannelRef,
}

/// One pressed button.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionInvocation {
    pub name: String,
    pub value: String,
}

/// Acting user identity.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Channel reference inside the interactive payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackChannelRef {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_payload_deserializes_from_slack_json() {
        let raw = r#"{
            "actions": [{"name": "response", "value": "2", "type": "button"}],
            "callback_id": "tally_poll_5ec4a7",
            "user": {"id": "U123", "name": "alice"},
            "channel": {"id": "C456", "name": "general"},
            "message_ts": "167.89"
        }"#;

        let payload: InteractivePayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.actions.len(), 1);
        assert_eq!(payload.actions[0].value, "2");
        assert_eq!(payload.callback_id, "tally_poll_5ec4a7");
        assert_eq!(payload.user.name, "alice");
        assert_eq!(payload.channel.id, "C456");
    }
}
