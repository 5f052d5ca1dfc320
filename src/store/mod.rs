//! Poll storage
//!
//! One collection of poll documents keyed by a store-assigned id. Vote
//! persistence is a single-response atomic mutation (count increment plus
//! voter-set membership change), never a whole-document rewrite, so two
//! concurrent votes cannot trample each other's counters.

pub mod memory;
pub mod mongo;

use crate::poll::vote::VoteUpdate;
use crate::poll::Poll;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors surfaced by a poll store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No poll document with the given id.
    #[error("poll not found: {0}")]
    NotFound(String),

    /// Backend failure (connection, timeout, malformed document).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable keyed storage for poll aggregates.
#[async_trait]
pub trait PollStore: Send + Sync {
    /// Persist a new poll; the store assigns and returns its id.
    async fn create(&self, poll: Poll) -> Result<Poll, StoreError>;

    /// Fetch a poll by id; `Ok(None)` when it does not exist.
    async fn get(&self, id: &str) -> Result<Option<Poll>, StoreError>;

    /// Apply one vote mutation to a single response slot, atomically.
    async fn apply_vote(&self, id: &str, update: &VoteUpdate) -> Result<(), StoreError>;

    /// Record the delivered message handle; called once after first delivery.
    async fn set_message_ref(&self, id: &str, message_ref: &str) -> Result<(), StoreError>;

    /// Remove the poll aggregate entirely.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
