//! Typed configuration
//!
//! Strongly-typed settings with documented defaults, loaded from an
//! optional JSON5 file and overridable through environment variables:
//! `TALLY_LISTEN`, `SLACK_BOT_TOKEN`, `SLACK_VERIFICATION_TOKEN`,
//! `DATABASE_URL`, `DATABASE_NAME`.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] json5::Error),
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub listen: String,
    pub slack: SlackConfig,
    pub store: StoreConfig,
}

/// Slack credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) used for Web API calls.
    pub bot_token: String,
    /// Shared secret slash-command requests must present.
    pub verification_token: String,
}

/// Poll store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// MongoDB connection string.
    pub url: String,
    /// Database holding the `polls` collection.
    pub database: String,
    /// Use the in-memory store instead of MongoDB (local runs, tests).
    pub in_memory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            slack: SlackConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "tally".to_string(),
            in_memory: false,
        }
    }
}

impl Config {
    /// Load configuration: file (when given), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => json5::from_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(listen) = std::env::var("TALLY_LISTEN") {
            self.listen = listen;
        }
        if let Ok(token) = std::env::var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = token;
        }
        if let Ok(token) = std::env::var("SLACK_VERIFICATION_TOKEN") {
            self.slack.verification_token = token;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.store.url = url;
        }
        if let Ok(name) = std::env::var("DATABASE_NAME") {
            self.store.database = name;
        }
    }
}
