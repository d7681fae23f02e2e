// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A `cafe` command isolated from the user's config and environment.
pub fn cafe(config_dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cafe");
    cmd.env("CAFE_CONFIG", config_dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("CAFE_API_URL")
        .env_remove("CAFE_LOG")
        .env_remove("COLOR");
    cmd
}

/// Requests the fake server has received.
#[derive(Default)]
pub struct Recorded {
    pub posts: Vec<Value>,
    pub deleted: Vec<String>,
}

/// Minimal chat server on a background runtime.
pub struct FakeServer {
    pub api_url: String,
    pub recorded: Arc<Mutex<Recorded>>,
}

fn session_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "summary": "",
        "updatedAt": "2026-03-01T12:00:00Z",
        "messageCount": 2
    })
}

fn not_found(what: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{what} not found") })),
    )
        .into_response()
}

impl FakeServer {
    pub fn start() -> FakeServer {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = Arc::clone(&recorded);
        let router = Router::new()
            .route(
                "/api/sessions",
                get(|| async { Json(json!([session_json("sess_1", "Lunch plans")])) })
                    .post(|| async { Json(session_json("sess_2", "New chat")) }),
            )
            .route(
                "/api/sessions/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "sess_1" {
                        Json(session_json("sess_1", "Lunch plans")).into_response()
                    } else {
                        not_found("session")
                    }
                })
                .delete(
                    |State(rec): State<Arc<Mutex<Recorded>>>, Path(id): Path<String>| async move {
                        rec.lock().unwrap().deleted.push(id);
                        StatusCode::NO_CONTENT
                    },
                ),
            )
            .route(
                "/api/sessions/{id}/messages",
                get(|| async {
                    Json(json!([{
                        "id": "m1",
                        "type": "cat",
                        "content": "Hello there",
                        "sender": { "id": "cat-1", "name": "Mochi", "avatar": "", "color": "#ff9900" },
                        "timestamp": "2026-03-01T09:05:00Z",
                        "sessionId": "sess_1"
                    }]))
                })
                .post(
                    |State(rec): State<Arc<Mutex<Recorded>>>,
                     Path(id): Path<String>,
                     Json(body): Json<Value>| async move {
                        let content = body["content"].clone();
                        rec.lock().unwrap().posts.push(body);
                        Json(json!({
                            "id": "m2",
                            "type": "user",
                            "content": content,
                            "timestamp": "2026-03-01T09:06:00Z",
                            "sessionId": id
                        }))
                    },
                ),
            )
            .route(
                "/api/sessions/{id}/stats",
                get(|| async { Json(json!({ "totalMessages": 4, "catMessages": 3 })) }),
            )
            .route(
                "/api/cats",
                get(|| async {
                    Json(json!([
                        { "id": "cat-1", "name": "Mochi", "avatar": "", "color": "#ff9900", "status": "idle" },
                        { "id": "cat-2", "name": "Mocha", "avatar": "", "color": "#00aaff", "status": "busy" }
                    ]))
                }),
            )
            .with_state(state);

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, router).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();
        FakeServer {
            api_url: format!("http://{addr}/api"),
            recorded,
        }
    }
}

/// An address nothing listens on.
pub fn unreachable_api_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}
