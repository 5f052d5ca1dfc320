//! In-memory poll store
//!
//! HashMap-backed store used by tests and tokenless local runs. Vote
//! mutations are applied under the write lock, which gives the same
//! single-response atomicity the Mongo store gets from its update operator.

use super::{PollStore, StoreError};
use crate::poll::vote::VoteUpdate;
use crate::poll::Poll;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory store keyed by poll id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    polls: RwLock<HashMap<String, Poll>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn create(&self, mut poll: Poll) -> Result<Poll, StoreError> {
        poll.id = uuid::Uuid::new_v4().simple().to_string();
        self.polls.write().insert(poll.id.clone(), poll.clone());
        Ok(poll)
    }

    async fn get(&self, id: &str) -> Result<Option<Poll>, StoreError> {
        Ok(self.polls.read().get(id).cloned())
    }

    async fn apply_vote(&self, id: &str, update: &VoteUpdate) -> Result<(), StoreError> {
        let mut polls = self.polls.write();
        let poll = polls
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        update.apply(poll);
        Ok(())
    }

    async fn set_message_ref(&self, id: &str, message_ref: &str) -> Result<(), StoreError> {
        let mut polls = self.polls.write();
        let poll = polls
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        poll.message_ref = message_ref.to_string();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.polls
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
