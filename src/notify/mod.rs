//! Outbound notification
//!
//! The seam between the poll engine and the messaging platform: deliver a
//! rendered view as a new message, update it in place, send ephemeral
//! notices, and delete the message when the poll goes away.

pub mod slack;

use crate::view::RenderedView;
use async_trait::async_trait;

pub use slack::SlackNotifier;

/// Errors surfaced by a notifier.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Transport failure (connection, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The platform accepted the request but reported a failure.
    #[error("slack api error: {0}")]
    Api(String),

    /// The platform's response could not be interpreted.
    #[error("response parse error: {0}")]
    Parse(String),
}

/// Delivers rendered poll views to the messaging platform.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post the view as a new message; returns the message handle.
    async fn post_new(&self, view: &RenderedView) -> Result<String, NotifyError>;

    /// Re-render an already delivered message in place.
    async fn update_existing(
        &self,
        message_ref: &str,
        view: &RenderedView,
    ) -> Result<(), NotifyError>;

    /// Send a notice visible only to one user in a channel.
    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), NotifyError>;

    /// Remove a previously delivered message.
    async fn delete_message(&self, channel: &str, message_ref: &str) -> Result<(), NotifyError>;
}
