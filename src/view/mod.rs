//! View projection
//!
//! Renders a poll into the Slack message payload: a formatted text body
//! plus button attachments. Projection is a pure function of the poll
//! state, so re-rendering after a vote is idempotent.

use crate::poll::{label, Poll, PollResponse};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Buttons per attachment; Slack caps attachment actions at five.
const BUTTONS_PER_GROUP: usize = 5;

/// Attachment sidebar color.
const COLOR: &str = "#283B49";

/// Prefix for callback identifiers round-tripped through Slack.
const CALLBACK_PREFIX: &str = "tally_poll_";

static CALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tally_poll_([a-z0-9]+)").unwrap());

/// Encode a poll id into a callback identifier.
pub fn callback_id(poll_id: &str) -> String {
    format!("{CALLBACK_PREFIX}{poll_id}")
}

/// Extract the poll id from a callback identifier, if it parses.
pub fn poll_id_from(callback_id: &str) -> Option<String> {
    CALLBACK_RE.captures(callback_id).map(|caps| caps[1].to_string())
}

/// One interactive button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub text: String,
}

/// One attachment: up to five buttons sharing a callback id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub callback_id: String,
    pub color: String,
    pub attachment_type: String,
    pub actions: Vec<ActionButton>,
}

/// The rendered, re-displayable representation of a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub channel: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

/// Project a poll into its rendered view.
pub fn project(poll: &Poll) -> RenderedView {
    let mut attachments: Vec<Attachment> = poll
        .responses
        .chunks(BUTTONS_PER_GROUP)
        .map(|group| Attachment {
            fallback: "Cannot display the responses".to_string(),
            callback_id: callback_id(&poll.id),
            color: COLOR.to_string(),
            attachment_type: "default".to_string(),
            actions: group.iter().map(vote_button).collect(),
        })
        .collect();
    attachments.push(delete_attachment(&poll.id));

    RenderedView {
        channel: poll.channel_id.clone(),
        text: render_text(poll),
        attachments,
    }
}

fn vote_button(response: &PollResponse) -> ActionButton {
    ActionButton {
        kind: "button".to_string(),
        name: "response".to_string(),
        value: response.slot.to_string(),
        style: None,
        text: label::caption(&response.text),
    }
}

fn delete_attachment(poll_id: &str) -> Attachment {
    Attachment {
        fallback: "Cannot display the remove button".to_string(),
        callback_id: callback_id(poll_id),
        color: COLOR.to_string(),
        attachment_type: "default".to_string(),
        actions: vec![ActionButton {
            kind: "button".to_string(),
            name: "delete".to_string(),
            value: "delete".to_string(),
            style: Some("danger".to_string()),
            text: "Delete poll".to_string(),
        }],
    }
}

/// Render the text body: bold question, then responses sorted by
/// descending vote count (stable on slot id), each with its voter line.
fn render_text(poll: &Poll) -> String {
    let mut ordered: Vec<&PollResponse> = poll.responses.iter().collect();
    ordered.sort_by(|a, b| b.votes.cmp(&a.votes));

    let mut lines = vec![format!("*{}*", poll.question), String::new()];
    for response in ordered {
        lines.push(format!(
            "\u{2022} *{}* `{}`",
            label::strip(&response.text),
            response.votes
        ));
        lines.push(render_voters(poll, response));
    }
    if poll.anonymous && !poll.hide_anonymous_notice {
        lines.push("> anonymous poll".to_string());
    }
    lines.join("\n")
}

/// Voter names in insertion order, italicized; empty for anonymous polls.
fn render_voters(poll: &Poll, response: &PollResponse) -> String {
    if poll.anonymous {
        return String::new();
    }
    response
        .voters
        .iter()
        .map(|name| format!("_{name}_"))
        .collect::<Vec<_>>()
        .join(", ")
}
