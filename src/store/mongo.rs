//! MongoDB poll store
//!
//! One `polls` collection of poll documents with a string `_id` assigned at
//! creation. Votes are persisted with a positional update (`$inc` on the
//! count, `$push`/`$pull` on the voter array) scoped to one response slot
//! and guarded by the voter's current membership, so the counter never goes
//! through a read-modify-write cycle and duplicate mutations are no-ops.

use super::{PollStore, StoreError};
use crate::poll::vote::{VoteOp, VoteUpdate};
use crate::poll::Poll;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;

/// MongoDB-backed poll store.
#[derive(Clone)]
pub struct MongoStore {
    polls: Collection<Poll>,
}

impl MongoStore {
    /// Connect to `url` and open the `polls` collection in `database`.
    pub async fn connect(url: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(url).await.map_err(backend)?;
        options.connect_timeout = Some(Duration::from_secs(10));
        options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(options).map_err(backend)?;
        Ok(Self {
            polls: client.database(database).collection("polls"),
        })
    }
}

#[async_trait]
impl PollStore for MongoStore {
    async fn create(&self, mut poll: Poll) -> Result<Poll, StoreError> {
        poll.id = ObjectId::new().to_hex();
        self.polls.insert_one(&poll).await.map_err(backend)?;
        Ok(poll)
    }

    async fn get(&self, id: &str) -> Result<Option<Poll>, StoreError> {
        self.polls
            .find_one(doc! { "_id": id })
            .await
            .map_err(backend)
    }

    async fn apply_vote(&self, id: &str, update: &VoteUpdate) -> Result<(), StoreError> {
        let result = self
            .polls
            .update_one(vote_filter(id, update), update_document(update))
            .await
            .map_err(backend)?;
        if result.matched_count == 0 {
            // The membership guard misses both when the poll is gone and
            // when the vote is already in the requested state; only the
            // former is an error, the latter is an idempotent no-op.
            let exists = self
                .polls
                .find_one(doc! { "_id": id })
                .await
                .map_err(backend)?
                .is_some();
            if !exists {
                return Err(StoreError::NotFound(id.to_string()));
            }
        }
        Ok(())
    }

    async fn set_message_ref(&self, id: &str, message_ref: &str) -> Result<(), StoreError> {
        let result = self
            .polls
            .update_one(doc! { "_id": id }, doc! { "$set": { "message_ref": message_ref } })
            .await
            .map_err(backend)?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = self
            .polls
            .delete_one(doc! { "_id": id })
            .await
            .map_err(backend)?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Filter for one vote mutation: matches the slot only while the voter's
/// membership disagrees with the requested state, so a duplicate Remove
/// (or Add) from a stale snapshot matches nothing and the `$inc` never
/// drives the count out of sync with the voter array.
fn vote_filter(id: &str, update: &VoteUpdate) -> Document {
    let membership: Bson = match update.op {
        VoteOp::Add => doc! { "$ne": update.voter.as_str() }.into(),
        VoteOp::Remove => update.voter.as_str().into(),
    };
    doc! {
        "_id": id,
        "responses": { "$elemMatch": { "slot": update.slot as i64, "voters": membership } },
    }
}

/// Atomic single-response mutation, addressed through the positional
/// operator so only the matched slot is touched.
fn update_document(update: &VoteUpdate) -> Document {
    match update.op {
        VoteOp::Add => doc! {
            "$inc": { "responses.$.votes": 1 },
            "$push": { "responses.$.voters": update.voter.as_str() },
        },
        VoteOp::Remove => doc! {
            "$inc": { "responses.$.votes": -1 },
            "$pull": { "responses.$.voters": update.voter.as_str() },
        },
    }
}

fn backend(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
