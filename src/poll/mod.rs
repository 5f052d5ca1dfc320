//! Poll model
//!
//! The `Poll` aggregate and its response slots. A poll is built once from a
//! parsed command and mutated only through the vote dispatcher (one
//! response's voters per accepted action) or deleted outright.

pub mod label;
pub mod vote;

use crate::cmd::{parse_duration, CommandError, PollOptions};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One selectable answer option.
///
/// Field names double as document paths in the Mongo store; see
/// `store::mongo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponse {
    /// Stable 1-based slot id, assigned in token order at creation.
    pub slot: u32,
    /// Full response text; may embed an `@label{...}` annotation.
    pub text: String,
    /// Active vote count; always equals `voters.len()`.
    pub votes: u32,
    /// Users currently credited with a vote, in insertion order.
    pub voters: Vec<String>,
}

impl PollResponse {
    fn new(slot: u32, text: String) -> Self {
        Self { slot, text, votes: 0, voters: Vec::new() }
    }

    /// Whether `voter` currently holds a vote on this response.
    pub fn has_voter(&self, voter: &str) -> bool {
        self.voters.iter().any(|v| v == voter)
    }
}

/// The poll aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Store-assigned identifier; empty until persisted.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// User who created the poll.
    pub owner_id: String,
    /// Channel the poll was posted to.
    pub channel_id: String,
    /// Question text.
    pub question: String,
    /// Response slots; insertion order is the selection order, not the
    /// rendering order.
    pub responses: Vec<PollResponse>,
    /// Creation time; immutable.
    pub created_at: DateTime<Utc>,
    /// Voting window in seconds; `0` means the poll never expires.
    pub expires_after_secs: u64,
    /// Hide voter names when rendering.
    pub anonymous: bool,
    /// Suppress the trailing "anonymous poll" notice.
    pub hide_anonymous_notice: bool,
    /// Max responses one user may vote for; `0` means unlimited.
    pub limit: u32,
    /// Handle of the delivered message; empty until first delivery, then
    /// set exactly once.
    #[serde(default)]
    pub message_ref: String,
}

impl Poll {
    /// Build a new poll from positional tokens and options.
    ///
    /// `tokens[0]` is the question; each remaining token becomes a response
    /// slot. Fails with [`CommandError::InsufficientTokens`] when fewer
    /// than a question and two responses are given, and with
    /// [`CommandError::InvalidDuration`] when `options.expires` does not
    /// parse.
    pub fn build(
        owner_id: &str,
        channel_id: &str,
        tokens: Vec<String>,
        options: PollOptions,
    ) -> Result<Self, CommandError> {
        if tokens.len() < 3 {
            return Err(CommandError::InsufficientTokens);
        }

        let expires_after_secs = if options.expires.is_empty() {
            0
        } else {
            parse_duration(&options.expires)?
        };

        let mut tokens = tokens.into_iter();
        let question = tokens.next().unwrap_or_default();
        let responses = tokens
            .enumerate()
            .map(|(i, text)| PollResponse::new(i as u32 + 1, text))
            .collect();

        Ok(Self {
            id: String::new(),
            owner_id: owner_id.to_string(),
            channel_id: channel_id.to_string(),
            question,
            responses,
            created_at: Utc::now(),
            expires_after_secs,
            anonymous: options.anonymous,
            hide_anonymous_notice: options.hide_anonymous_notice,
            limit: options.limit,
            message_ref: String::new(),
        })
    }

    /// Look up a response slot by its id.
    pub fn response(&self, slot: u32) -> Option<&PollResponse> {
        self.responses.iter().find(|r| r.slot == slot)
    }

    /// Number of responses `voter` currently holds a vote on.
    pub fn votes_by(&self, voter: &str) -> usize {
        self.responses.iter().filter(|r| r.has_voter(voter)).count()
    }

    /// Whether the voting window has closed as of `now`.
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_after_secs > 0
            && now >= self.created_at + Duration::seconds(self.expires_after_secs as i64)
    }
}
