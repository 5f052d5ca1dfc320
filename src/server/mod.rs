//! HTTP surface
//!
//! Two POST endpoints behind a shared-secret token: `/post` creates a poll
//! from a slash command, `/actions` handles button presses. Every handled
//! failure is mapped to an ephemeral message for the acting user; the
//! request itself still completes with 200 unless even that delivery fails.

pub mod payload;

use crate::cmd::{self, Command, CommandError};
use crate::notify::{Notifier, NotifyError};
use crate::poll::vote::{self, VoteError};
use crate::poll::Poll;
use crate::store::{PollStore, StoreError};
use crate::view;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use payload::{ActionsBody, InteractivePayload, SlashCommand};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared per-request dependencies.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub notifier: Arc<dyn Notifier>,
    /// Shared-secret token slash-command requests must carry.
    pub verification_token: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/post", post(handle_command))
        .route("/actions", post(handle_action))
        .with_state(state)
}

/// Everything a request handler can fail with, each mapped to a
/// user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("unknown poll")]
    UnknownPoll,

    /// The interactive payload carried no consumable action.
    #[error("malformed action payload")]
    MalformedPayload,

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl BotError {
    /// Ephemeral message shown to the acting user. Total over the error
    /// taxonomy; transport details never leak to chat.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::Command(CommandError::InsufficientTokens) => {
                "Not enough values to create the poll. A poll needs a question and at least two responses."
            }
            BotError::Command(CommandError::InvalidDuration(_)) => {
                "Cannot interpret the `--expires` duration. Try something like `1d 2h` or `30min`."
            }
            BotError::Command(CommandError::InvalidFlag(_)) | BotError::MalformedPayload => {
                "Cannot interpret the command. Run with `--help` for usage."
            }
            BotError::UnknownPoll | BotError::Vote(VoteError::UnknownResponse) => {
                "This poll is no longer available."
            }
            BotError::Vote(VoteError::VoteExpired) => {
                "The ability to vote on this poll has expired."
            }
            BotError::Vote(VoteError::VoteLimitReached) => {
                "You have reached the number of responses you can vote for on this poll."
            }
            BotError::Store(_) | BotError::Notify(_) => {
                "Something went wrong, please try again later."
            }
        }
    }
}

async fn health() -> &'static str {
    "tally poll bot up and running\n"
}

/// `POST /post` — create a poll from a slash command.
async fn handle_command(
    State(state): State<AppState>,
    Form(body): Form<SlashCommand>,
) -> Response {
    if body.token != state.verification_token {
        warn!(user = %body.user_id, "slash command with bad verification token");
        return (StatusCode::FORBIDDEN, "Access forbidden").into_response();
    }

    match run_command(&state, &body).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => reject(&state, &body.channel_id, &body.user_id, err).await,
    }
}

async fn run_command(state: &AppState, body: &SlashCommand) -> Result<(), BotError> {
    match cmd::parse(&body.text)? {
        Command::Help => {
            state
                .notifier
                .post_ephemeral(&body.channel_id, &body.user_id, &cmd::help_text())
                .await?;
        }
        Command::Create { tokens, options } => {
            let poll = Poll::build(&body.user_id, &body.channel_id, tokens, options)?;
            let poll = state.store.create(poll).await?;
            let rendered = view::project(&poll);
            let message_ref = state.notifier.post_new(&rendered).await?;
            state.store.set_message_ref(&poll.id, &message_ref).await?;
            info!(poll = %poll.id, channel = %poll.channel_id, "poll created");
        }
    }
    Ok(())
}

/// `POST /actions` — vote toggle or poll deletion from a button press.
async fn handle_action(State(state): State<AppState>, Form(body): Form<ActionsBody>) -> Response {
    let payload: InteractivePayload = match serde_json::from_str(&body.payload) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%err, "unparsable interactive payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let channel = payload.channel.id.clone();
    let user = payload.user.id.clone();
    match run_action(&state, payload).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => reject(&state, &channel, &user, err).await,
    }
}

async fn run_action(state: &AppState, payload: InteractivePayload) -> Result<(), BotError> {
    let action = payload.actions.first().ok_or(BotError::MalformedPayload)?;
    let poll_id = view::poll_id_from(&payload.callback_id).ok_or(BotError::UnknownPoll)?;

    if action.name == "delete" {
        let poll = state.store.get(&poll_id).await?.ok_or(BotError::UnknownPoll)?;
        state.store.delete(&poll_id).await?;
        if !poll.message_ref.is_empty() {
            state
                .notifier
                .delete_message(&poll.channel_id, &poll.message_ref)
                .await?;
        }
        info!(poll = %poll_id, "poll deleted");
        return Ok(());
    }

    let slot: u32 = action
        .value
        .parse()
        .map_err(|_| VoteError::UnknownResponse)?;
    let poll = state.store.get(&poll_id).await?.ok_or(BotError::UnknownPoll)?;

    let update = vote::dispatch(&payload.user.name, &poll, slot, Utc::now())?;
    state.store.apply_vote(&poll.id, &update).await?;

    // Re-fetch so the rendered view reflects concurrent votes too.
    let poll = state.store.get(&poll_id).await?.ok_or(BotError::UnknownPoll)?;
    let rendered = view::project(&poll);
    state.notifier.update_existing(&poll.message_ref, &rendered).await?;
    Ok(())
}

/// Deliver a handled failure to the user. Only a broken ephemeral delivery
/// turns into a 500.
async fn reject(state: &AppState, channel: &str, user: &str, err: BotError) -> Response {
    match &err {
        BotError::Store(inner) => error!(%inner, "store failure"),
        BotError::Notify(inner) => error!(%inner, "notifier failure"),
        other => info!(%other, "request rejected"),
    }

    match state
        .notifier
        .post_ephemeral(channel, user, err.user_message())
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(notify_err) => {
            error!(%notify_err, "could not deliver rejection notice");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
