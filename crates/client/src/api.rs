// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST client for the chat server.
//!
//! One method per endpoint. Non-2xx responses become
//! [`ClientError::Status`] carrying the server's `error` field when the body
//! has one.

use std::future::Future;
use std::pin::Pin;

use cafe_core::{
    CallHistory, Message, MessageStats, ModeConfig, ModeInfo, Participant, Session, SessionMode,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// First page of a session timeline, as the server numbers them.
pub const FIRST_PAGE: u32 = 1;
/// Page size used by the pull path.
pub const PAGE_LIMIT: u32 = 50;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest<'a> {
    content: &'a str,
    #[serde(rename = "mentionedCats")]
    mentioned: &'a [String],
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetModeRequest<'a> {
    mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode_config: Option<&'a ModeConfig>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(ApiClient {
            http,
            base: config.api_base()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be a base url".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(parsed) => parsed.error,
            Err(_) => text,
        };
        Err(ClientError::Status { status, body })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.endpoint(segments)?;
        Ok(self.execute(self.http.get(url)).await?.json().await?)
    }

    pub async fn list_sessions(&self) -> ClientResult<Vec<Session>> {
        self.get(&["sessions"]).await
    }

    pub async fn create_session(&self) -> ClientResult<Session> {
        let url = self.endpoint(&["sessions"])?;
        Ok(self.execute(self.http.post(url)).await?.json().await?)
    }

    pub async fn get_session(&self, session_id: &str) -> ClientResult<Session> {
        self.get(&["sessions", session_id]).await
    }

    pub async fn rename_session(&self, session_id: &str, name: &str) -> ClientResult<Session> {
        let url = self.endpoint(&["sessions", session_id])?;
        let request = self.http.put(url).json(&RenameRequest { name });
        Ok(self.execute(request).await?.json().await?)
    }

    pub async fn delete_session(&self, session_id: &str) -> ClientResult<()> {
        let url = self.endpoint(&["sessions", session_id])?;
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    pub async fn list_messages(
        &self,
        session_id: &str,
        page: u32,
        limit: u32,
    ) -> ClientResult<Vec<Message>> {
        let url = self.endpoint(&["sessions", session_id, "messages"])?;
        let request = self.http.get(url).query(&[("page", page), ("limit", limit)]);
        Ok(self.execute(request).await?.json().await?)
    }

    /// Posts a user message and returns the stored copy.
    pub async fn send_message(
        &self,
        session_id: &str,
        content: &str,
        mentioned: &[String],
    ) -> ClientResult<Message> {
        let url = self.endpoint(&["sessions", session_id, "messages"])?;
        let request = self
            .http
            .post(url)
            .json(&SendMessageRequest { content, mentioned });
        Ok(self.execute(request).await?.json().await?)
    }

    pub async fn message_stats(&self, session_id: &str) -> ClientResult<MessageStats> {
        self.get(&["sessions", session_id, "stats"]).await
    }

    pub async fn list_participants(&self) -> ClientResult<Vec<Participant>> {
        self.get(&["cats"]).await
    }

    pub async fn get_participant(&self, participant_id: &str) -> ClientResult<Participant> {
        self.get(&["cats", participant_id]).await
    }

    /// Participants currently idle.
    pub async fn available_participants(&self) -> ClientResult<Vec<Participant>> {
        self.get(&["cats", "available"]).await
    }

    pub async fn call_history(&self, session_id: &str) -> ClientResult<Vec<CallHistory>> {
        self.get(&["sessions", session_id, "history"]).await
    }

    pub async fn list_modes(&self) -> ClientResult<Vec<ModeInfo>> {
        self.get(&["modes"]).await
    }

    pub async fn session_mode(&self, session_id: &str) -> ClientResult<SessionMode> {
        self.get(&["sessions", session_id, "mode"]).await
    }

    pub async fn set_session_mode(
        &self,
        session_id: &str,
        mode: &str,
        config: Option<&ModeConfig>,
    ) -> ClientResult<SessionMode> {
        let url = self.endpoint(&["sessions", session_id, "mode"])?;
        let request = self.http.put(url).json(&SetModeRequest {
            mode,
            mode_config: config,
        });
        Ok(self.execute(request).await?.json().await?)
    }
}

/// Where the pull path reads a session timeline from.
pub trait TimelineSource: Send + Sync + 'static {
    fn fetch_timeline(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = ClientResult<Vec<Message>>> + Send + '_>>;
}

impl TimelineSource for ApiClient {
    fn fetch_timeline(
        &self,
        session_id: &str,
    ) -> Pin<Box<dyn Future<Output = ClientResult<Vec<Message>>> + Send + '_>> {
        let session_id = session_id.to_string();
        Box::pin(async move {
            self.list_messages(&session_id, FIRST_PAGE, PAGE_LIMIT)
                .await
        })
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
