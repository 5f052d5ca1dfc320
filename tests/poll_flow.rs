//! End-to-end poll flow tests
//!
//! Drives the axum router with the in-memory store and a recording
//! notifier: create a poll over `/post`, then vote, toggle, and delete it
//! over `/actions`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use std::sync::Arc;
use tally::notify::{Notifier, NotifyError};
use tally::server::{self, AppState};
use tally::store::{MemoryStore, PollStore};
use tally::view::{self, RenderedView};
use tower::ServiceExt;

const TOKEN: &str = "shh-its-a-secret";

/// Notifier that records every delivery instead of calling Slack.
#[derive(Default)]
struct RecordingNotifier {
    posted: Mutex<Vec<RenderedView>>,
    updated: Mutex<Vec<(String, RenderedView)>>,
    ephemeral: Mutex<Vec<(String, String, String)>>,
    deleted: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_new(&self, view: &RenderedView) -> Result<String, NotifyError> {
        self.posted.lock().push(view.clone());
        Ok("100.200".to_string())
    }

    async fn update_existing(
        &self,
        message_ref: &str,
        view: &RenderedView,
    ) -> Result<(), NotifyError> {
        self.updated.lock().push((message_ref.to_string(), view.clone()));
        Ok(())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), NotifyError> {
        self.ephemeral
            .lock()
            .push((channel.to_string(), user.to_string(), text.to_string()));
        Ok(())
    }

    async fn delete_message(&self, channel: &str, message_ref: &str) -> Result<(), NotifyError> {
        self.deleted
            .lock()
            .push((channel.to_string(), message_ref.to_string()));
        Ok(())
    }
}

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        store: store.clone(),
        notifier: notifier.clone(),
        verification_token: TOKEN.to_string(),
    };
    Harness { app: server::router(state), store, notifier }
}

fn slash_command(token: &str, text: &str) -> Request<Body> {
    let body = format!(
        "token={}&user_id=U1&user_name=owner&channel_id=C1&text={}",
        urlencoding::encode(token),
        urlencoding::encode(text)
    );
    Request::builder()
        .method("POST")
        .uri("/post")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn action_request(callback_id: &str, name: &str, value: &str, user_name: &str) -> Request<Body> {
    let payload = serde_json::json!({
        "actions": [{"name": name, "value": value, "type": "button"}],
        "callback_id": callback_id,
        "user": {"id": format!("U-{user_name}"), "name": user_name},
        "channel": {"id": "C1"},
    });
    let body = format!("payload={}", urlencoding::encode(&payload.to_string()));
    Request::builder()
        .method("POST")
        .uri("/actions")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Poll id of the single poll the harness notifier has seen.
fn posted_poll_id(notifier: &RecordingNotifier) -> String {
    let posted = notifier.posted.lock();
    let view = posted.last().expect("a poll was posted");
    view::poll_id_from(&view.attachments[0].callback_id).expect("callback id parses")
}

async fn create_poll(h: &Harness, text: &str) -> String {
    let response = h.app.clone().oneshot(slash_command(TOKEN, text)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    posted_poll_id(&h.notifier)
}

async fn vote(h: &Harness, poll_id: &str, slot: u32, user: &str) -> StatusCode {
    let request = action_request(
        &view::callback_id(poll_id),
        "response",
        &slot.to_string(),
        user,
    );
    h.app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn create_posts_the_rendered_poll_and_records_the_message_ref() {
    let h = harness();
    let poll_id = create_poll(&h, "Drink? Beer Water").await;

    let poll = h.store.get(&poll_id).await.unwrap().unwrap();
    assert_eq!(poll.question, "Drink?");
    assert_eq!(poll.responses.len(), 2);
    assert!(poll.responses.iter().all(|r| r.votes == 0));
    assert_eq!(poll.message_ref, "100.200");

    let posted = h.notifier.posted.lock();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].text.contains("*Drink?*"));
}

#[tokio::test]
async fn bad_verification_token_is_forbidden() {
    let h = harness();
    let response = h
        .app
        .clone()
        .oneshot(slash_command("wrong", "Drink? Beer Water"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(h.notifier.posted.lock().is_empty());
}

#[tokio::test]
async fn too_few_values_yields_an_ephemeral_rejection() {
    let h = harness();
    let response = h.app.clone().oneshot(slash_command(TOKEN, "Drink? Beer")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ephemeral = h.notifier.ephemeral.lock();
    assert_eq!(ephemeral.len(), 1);
    assert!(ephemeral[0].2.contains("Not enough values"));
    assert!(h.notifier.posted.lock().is_empty());
}

#[tokio::test]
async fn first_vote_adds_and_second_vote_withdraws() {
    let h = harness();
    let poll_id = create_poll(&h, "Drink? Beer Water").await;

    assert_eq!(vote(&h, &poll_id, 1, "alice").await, StatusCode::OK);
    let poll = h.store.get(&poll_id).await.unwrap().unwrap();
    assert_eq!(poll.responses[0].votes, 1);
    assert_eq!(poll.responses[0].voters, vec!["alice"]);

    // Same user, same slot: toggles back off.
    assert_eq!(vote(&h, &poll_id, 1, "alice").await, StatusCode::OK);
    let poll = h.store.get(&poll_id).await.unwrap().unwrap();
    assert_eq!(poll.responses[0].votes, 0);
    assert!(poll.responses[0].voters.is_empty());

    // Each accepted vote re-rendered the message in place.
    let updated = h.notifier.updated.lock();
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|(ts, _)| ts == "100.200"));
}

#[tokio::test]
async fn vote_limit_rejects_a_second_response_with_an_ephemeral_notice() {
    let h = harness();
    let poll_id = create_poll(&h, "Drink? Beer Water --limit 1").await;

    assert_eq!(vote(&h, &poll_id, 1, "alice").await, StatusCode::OK);
    assert_eq!(vote(&h, &poll_id, 2, "alice").await, StatusCode::OK);

    let poll = h.store.get(&poll_id).await.unwrap().unwrap();
    assert_eq!(poll.responses[0].votes, 1);
    assert_eq!(poll.responses[1].votes, 0);

    let ephemeral = h.notifier.ephemeral.lock();
    assert_eq!(ephemeral.len(), 1);
    assert!(ephemeral[0].2.contains("number of responses"));
}

#[tokio::test]
async fn delete_action_removes_the_poll_and_its_message() {
    let h = harness();
    let poll_id = create_poll(&h, "Drink? Beer Water").await;

    let request = action_request(&view::callback_id(&poll_id), "delete", "delete", "owner");
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(h.store.get(&poll_id).await.unwrap().is_none());
    let deleted = h.notifier.deleted.lock();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0], ("C1".to_string(), "100.200".to_string()));
}

#[tokio::test]
async fn unknown_callback_id_reports_the_poll_as_gone() {
    let h = harness();
    let request = action_request("not-a-callback", "response", "1", "alice");
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ephemeral = h.notifier.ephemeral.lock();
    assert_eq!(ephemeral.len(), 1);
    assert!(ephemeral[0].2.contains("no longer available"));
}

#[tokio::test]
async fn help_flag_sends_usage_as_an_ephemeral_message() {
    let h = harness();
    let response = h.app.clone().oneshot(slash_command(TOKEN, "--help")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let ephemeral = h.notifier.ephemeral.lock();
    assert_eq!(ephemeral.len(), 1);
    assert!(ephemeral[0].2.contains("--limit"));
    assert!(h.notifier.posted.lock().is_empty());
}
