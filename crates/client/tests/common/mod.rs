// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fake of the chat server for integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cafe_client::ClientConfig;
use cafe_core::{
    CallHistory, Envelope, Message, MessageKind, MessageStats, ModeInfo, Participant,
    ParticipantStatus, Sender, Session, SessionMode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

#[derive(Default)]
struct Data {
    sessions: Vec<Session>,
    messages: HashMap<String, Vec<Message>>,
    history: HashMap<String, Vec<CallHistory>>,
    modes: HashMap<String, SessionMode>,
    next_id: u64,
}

/// Requests the fake has seen.
#[derive(Default)]
pub struct Seen {
    /// Session ids of every timeline fetch, in order.
    pub timeline_fetches: Vec<String>,
    /// Bodies of every message post.
    pub posts: Vec<Value>,
    /// Session ids of every push-socket upgrade.
    pub sockets: Vec<String>,
}

pub struct Backend {
    data: Mutex<Data>,
    pub seen: Mutex<Seen>,
    participants: Vec<Participant>,
    push: broadcast::Sender<(String, String)>,
}

impl Backend {
    fn next_id(&self, prefix: &str) -> String {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        format!("{prefix}-{}", data.next_id)
    }

    pub fn add_session(&self, id: &str, name: &str) -> Session {
        let session = Session {
            id: id.to_string(),
            name: name.to_string(),
            summary: String::new(),
            updated_at: Utc::now(),
            message_count: 0,
        };
        let mut data = self.data.lock().unwrap();
        data.sessions.push(session.clone());
        data.modes.insert(id.to_string(), free_discussion());
        session
    }

    /// Appends a reply from the first participant to a session timeline,
    /// as the server does when a participant answers.
    pub fn add_reply(&self, session_id: &str, content: &str) -> Message {
        let cat = &self.participants[0];
        let message = Message {
            id: self.next_id("reply"),
            kind: MessageKind::Agent,
            content: content.to_string(),
            sender: Some(Sender {
                id: cat.id.clone(),
                name: cat.name.clone(),
                avatar: cat.avatar.clone(),
                color: Some(cat.color.clone()),
            }),
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
        };
        self.data
            .lock()
            .unwrap()
            .messages
            .entry(session_id.to_string())
            .or_default()
            .push(message.clone());
        message
    }

    pub fn add_history(&self, session_id: &str, records: Vec<CallHistory>) {
        self.data
            .lock()
            .unwrap()
            .history
            .insert(session_id.to_string(), records);
    }

    /// Sends a text frame to every socket of `session_id`.
    pub fn push_raw(&self, session_id: &str, frame: impl Into<String>) {
        let _ = self.push.send((session_id.to_string(), frame.into()));
    }

    pub fn push(&self, session_id: &str, envelope: &Envelope) {
        self.push_raw(session_id, envelope.to_json().unwrap());
    }

    /// Stores a message and pushes it, as the server does for new messages.
    pub fn publish(&self, message: &Message) {
        self.data
            .lock()
            .unwrap()
            .messages
            .entry(message.session_id.clone())
            .or_default()
            .push(message.clone());
        self.push(&message.session_id, &Envelope::message(message.clone()));
    }

    pub fn socket_count(&self) -> usize {
        self.push.receiver_count()
    }

    pub fn timeline_fetches(&self) -> Vec<String> {
        self.seen.lock().unwrap().timeline_fetches.clone()
    }

    pub fn posts(&self) -> Vec<Value> {
        self.seen.lock().unwrap().posts.clone()
    }

    pub fn sockets(&self) -> Vec<String> {
        self.seen.lock().unwrap().sockets.clone()
    }
}

fn free_discussion() -> SessionMode {
    serde_json::from_value(json!({
        "mode": "free_discussion",
        "description": "Everyone talks",
        "config": {"name": "free_discussion", "enabled": true},
        "state": {"customState": {}, "lastUpdateTime": null}
    }))
    .unwrap()
}

pub fn participants() -> Vec<Participant> {
    [
        ("cat-1", "Mochi", ParticipantStatus::Idle),
        ("cat-2", "Mocha", ParticipantStatus::Busy),
        ("cat-3", "Tofu", ParticipantStatus::Idle),
    ]
    .into_iter()
    .map(|(id, name, status)| Participant {
        id: id.into(),
        name: name.into(),
        avatar: format!("/images/{id}.png"),
        color: "#ff9900".into(),
        status,
    })
    .collect()
}

type Shared = Arc<Backend>;

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": format!("{what} not found")}))).into_response()
}

async fn list_sessions(State(b): State<Shared>) -> Json<Vec<Session>> {
    Json(b.data.lock().unwrap().sessions.clone())
}

async fn create_session(State(b): State<Shared>) -> Json<Session> {
    let id = b.next_id("sess");
    Json(b.add_session(&id, "New session"))
}

async fn get_session(State(b): State<Shared>, Path(id): Path<String>) -> Response {
    let data = b.data.lock().unwrap();
    match data.sessions.iter().find(|s| s.id == id) {
        Some(session) => Json(session.clone()).into_response(),
        None => not_found("session"),
    }
}

#[derive(Deserialize)]
struct Rename {
    name: String,
}

async fn rename_session(
    State(b): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Rename>,
) -> Response {
    let mut data = b.data.lock().unwrap();
    match data.sessions.iter_mut().find(|s| s.id == id) {
        Some(session) => {
            session.name = body.name;
            Json(session.clone()).into_response()
        }
        None => not_found("session"),
    }
}

async fn delete_session(State(b): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = b.data.lock().unwrap();
    let before = data.sessions.len();
    data.sessions.retain(|s| s.id != id);
    if data.sessions.len() == before {
        return not_found("session");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_messages(
    State(b): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Vec<Message>> {
    assert_eq!(query.get("page").map(String::as_str), Some("1"));
    assert_eq!(query.get("limit").map(String::as_str), Some("50"));
    b.seen.lock().unwrap().timeline_fetches.push(id.clone());
    let data = b.data.lock().unwrap();
    Json(data.messages.get(&id).cloned().unwrap_or_default())
}

async fn send_message(
    State(b): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Message> {
    let message = Message {
        id: b.next_id("msg"),
        kind: MessageKind::User,
        content: body["content"].as_str().unwrap_or_default().to_string(),
        sender: None,
        timestamp: Utc::now(),
        session_id: id.clone(),
    };
    b.seen.lock().unwrap().posts.push(body);
    b.data
        .lock()
        .unwrap()
        .messages
        .entry(id)
        .or_default()
        .push(message.clone());
    Json(message)
}

async fn stats(State(b): State<Shared>, Path(id): Path<String>) -> Json<MessageStats> {
    let data = b.data.lock().unwrap();
    let messages = data.messages.get(&id).cloned().unwrap_or_default();
    Json(MessageStats {
        total_messages: messages.len() as u64,
        agent_messages: messages.iter().filter(|m| m.is_from_agent()).count() as u64,
    })
}

async fn history(State(b): State<Shared>, Path(id): Path<String>) -> Json<Vec<CallHistory>> {
    Json(b.data.lock().unwrap().history.get(&id).cloned().unwrap_or_default())
}

async fn get_mode(State(b): State<Shared>, Path(id): Path<String>) -> Response {
    match b.data.lock().unwrap().modes.get(&id) {
        Some(mode) => Json(mode.clone()).into_response(),
        None => not_found("session"),
    }
}

async fn set_mode(
    State(b): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = b.data.lock().unwrap();
    let Some(mode) = data.modes.get_mut(&id) else {
        return not_found("session");
    };
    mode.mode = body["mode"].as_str().unwrap_or_default().to_string();
    Json(mode.clone()).into_response()
}

async fn list_modes() -> Json<Vec<ModeInfo>> {
    Json(vec![
        ModeInfo {
            name: "free_discussion".into(),
            description: "Everyone talks".into(),
        },
        ModeInfo {
            name: "ipd_dev".into(),
            description: "Product development".into(),
        },
    ])
}

async fn list_cats(State(b): State<Shared>) -> Json<Vec<Participant>> {
    Json(b.participants.clone())
}

async fn available_cats(State(b): State<Shared>) -> Json<Vec<Participant>> {
    Json(
        b.participants
            .iter()
            .filter(|p| p.status == ParticipantStatus::Idle)
            .cloned()
            .collect(),
    )
}

async fn get_cat(State(b): State<Shared>, Path(id): Path<String>) -> Response {
    match b.participants.iter().find(|p| p.id == id) {
        Some(cat) => Json(cat.clone()).into_response(),
        None => not_found("cat"),
    }
}

async fn push_socket(
    State(b): State<Shared>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    b.seen.lock().unwrap().sockets.push(id.clone());
    let rx = b.push.subscribe();
    ws.on_upgrade(move |socket| serve_socket(socket, id, rx))
}

async fn serve_socket(
    mut socket: WebSocket,
    session_id: String,
    mut rx: broadcast::Receiver<(String, String)>,
) {
    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Ok((target, text)) if target == session_id => {
                    if socket.send(WsMessage::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }
}

/// A running fake server.
pub struct FakeServer {
    pub addr: SocketAddr,
    pub backend: Arc<Backend>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let (push, _) = broadcast::channel(64);
        let backend = Arc::new(Backend {
            data: Mutex::new(Data::default()),
            seen: Mutex::new(Seen::default()),
            participants: participants(),
            push,
        });

        let app = Router::new()
            .route("/api/sessions", get(list_sessions).post(create_session))
            .route(
                "/api/sessions/{id}",
                get(get_session).put(rename_session).delete(delete_session),
            )
            .route(
                "/api/sessions/{id}/messages",
                get(list_messages).post(send_message),
            )
            .route("/api/sessions/{id}/stats", get(stats))
            .route("/api/sessions/{id}/history", get(history))
            .route("/api/sessions/{id}/mode", get(get_mode).put(set_mode))
            .route("/api/sessions/{id}/ws", get(push_socket))
            .route("/api/cats", get(list_cats))
            .route("/api/cats/available", get(available_cats))
            .route("/api/cats/{id}", get(get_cat))
            .route("/api/modes", get(list_modes))
            .with_state(Arc::clone(&backend));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeServer { addr, backend }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client config with fast polling against this server.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            poll_interval_ms: 60,
            poll_interval_pending_ms: 20,
            reconnect_base_ms: 20,
            reconnect_cap_ms: 100,
            ..ClientConfig::with_api_url(self.api_url())
        }
    }
}

/// Polls `check` until it holds or five seconds pass.
pub async fn eventually(what: &str, mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !check() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
