//! Vote dispatch
//!
//! Pure decision for one user/response/poll triple: toggle off an existing
//! vote, add a new one, or reject. The outcome is a description of the
//! single-response mutation to apply; persisting it is the store's job.

use super::Poll;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reasons a vote action is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    /// The targeted slot id does not exist on this poll.
    #[error("unknown poll response")]
    UnknownResponse,

    /// The poll's voting window has closed.
    #[error("the ability to vote on this poll has expired")]
    VoteExpired,

    /// The user already holds `limit` votes on other responses.
    #[error("max number of responses you can vote for has been reached")]
    VoteLimitReached,
}

/// Direction of the single-response mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOp {
    /// Add the voter and increment the count.
    Add,
    /// Remove the voter and decrement the count.
    Remove,
}

/// The mutation an accepted vote action applies to one response slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteUpdate {
    /// Target response slot.
    pub slot: u32,
    /// Acting voter identity.
    pub voter: String,
    pub op: VoteOp,
}

impl VoteUpdate {
    /// Apply this mutation to an in-memory poll.
    ///
    /// Used by the in-memory store; the Mongo store expresses the same
    /// mutation as an atomic document update instead.
    pub fn apply(&self, poll: &mut Poll) {
        let Some(response) = poll.responses.iter_mut().find(|r| r.slot == self.slot) else {
            return;
        };
        match self.op {
            VoteOp::Add => {
                if !response.has_voter(&self.voter) {
                    response.voters.push(self.voter.clone());
                    response.votes += 1;
                }
            }
            VoteOp::Remove => {
                if let Some(i) = response.voters.iter().position(|v| v == &self.voter) {
                    response.voters.remove(i);
                    response.votes = response.votes.saturating_sub(1);
                }
            }
        }
    }
}

/// Decide the next state of one response slot for `voter`.
///
/// Toggling off an existing vote is always allowed, even when the user sits
/// exactly at the limit, so nobody can get stuck unable to withdraw.
pub fn dispatch(
    voter: &str,
    poll: &Poll,
    slot: u32,
    now: DateTime<Utc>,
) -> Result<VoteUpdate, VoteError> {
    let response = poll.response(slot).ok_or(VoteError::UnknownResponse)?;

    if poll.expired_at(now) {
        return Err(VoteError::VoteExpired);
    }

    if response.has_voter(voter) {
        return Ok(VoteUpdate { slot, voter: voter.to_string(), op: VoteOp::Remove });
    }

    if poll.limit > 0 && poll.votes_by(voter) >= poll.limit as usize {
        return Err(VoteError::VoteLimitReached);
    }

    Ok(VoteUpdate { slot, voter: voter.to_string(), op: VoteOp::Add })
}
