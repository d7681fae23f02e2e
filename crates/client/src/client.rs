// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! High-level client.
//!
//! [`CafeClient`] is what a view talks to. It owns the store, the API client
//! and the session lifecycle, and turns every user action into API calls
//! plus store events.

use std::sync::Arc;

use cafe_core::history::{self, HistoryGroup};
use cafe_core::{
    Event, Key, KeyOutcome, Message, ModeConfig, Participant, Session, SessionMode, State, Store,
    Submission,
};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::connection::TransportManager;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionSync;
use crate::transport::{Transport, WebSocketTransport};

/// Chat client bound to one server.
pub struct CafeClient<T: Transport + 'static = WebSocketTransport> {
    config: ClientConfig,
    store: Store,
    api: Arc<ApiClient>,
    sync: SessionSync<T>,
}

impl CafeClient<WebSocketTransport> {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = TransportManager::new(config.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport + 'static> CafeClient<T> {
    /// Builds a client around a prepared transport manager.
    pub fn with_transport(
        config: ClientConfig,
        transport: TransportManager<T>,
    ) -> ClientResult<Self> {
        // Surface a bad API URL now rather than on first activation.
        config.push_url("check")?;
        let api = Arc::new(ApiClient::new(&config)?);
        let store = Store::new();
        let sync = SessionSync::with_transport(store.clone(), Arc::clone(&api), transport, &config);
        Ok(CafeClient {
            config,
            store,
            api,
            sync,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> Arc<State> {
        self.store.state()
    }

    /// True while the push link of the active session is open.
    pub fn is_live(&self) -> bool {
        self.sync.is_live()
    }

    pub async fn load_sessions(&self) -> ClientResult<Arc<Vec<Session>>> {
        let sessions = self.api.list_sessions().await?;
        debug!(count = sessions.len(), "sessions loaded");
        self.store.dispatch(Event::SessionsLoaded(sessions));
        Ok(Arc::clone(&self.store.state().sessions))
    }

    /// Fetches the participant directory.
    pub async fn load_participants(&self) -> ClientResult<Arc<Vec<Participant>>> {
        let participants = self.api.list_participants().await?;
        self.store.dispatch(Event::ParticipantsLoaded(participants));
        Ok(Arc::clone(&self.store.state().participants))
    }

    pub async fn load_modes(&self) -> ClientResult<()> {
        let modes = self.api.list_modes().await?;
        self.store.dispatch(Event::ModesLoaded(modes));
        Ok(())
    }

    /// Creates a session, puts it at the top of the list and opens it.
    pub async fn create_session(&mut self) -> ClientResult<Session> {
        let session = self.api.create_session().await?;
        info!(session_id = %session.id, "session created");
        self.store.dispatch(Event::SessionCreated(session.clone()));
        self.sync.activate(session.clone()).await?;
        Ok(session)
    }

    pub async fn rename_session(&self, session_id: &str, name: &str) -> ClientResult<Session> {
        let session = self.api.rename_session(session_id, name).await?;
        self.store.dispatch(Event::SessionUpdated(session.clone()));
        Ok(session)
    }

    /// Deletes a session. Deleting the open session closes it first.
    pub async fn delete_session(&mut self, session_id: &str) -> ClientResult<()> {
        self.api.delete_session(session_id).await?;
        if self.sync.active_id() == Some(session_id) {
            self.sync.deactivate().await;
        }
        self.store.dispatch(Event::SessionDeleted(session_id.to_string()));
        info!(session_id, "session deleted");
        Ok(())
    }

    /// Opens a session by id, fetching its record when the list does not
    /// have it.
    pub async fn open_session(&mut self, session_id: &str) -> ClientResult<Session> {
        let known = self
            .store
            .state()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .cloned();
        let session = match known {
            Some(session) => session,
            None => self.api.get_session(session_id).await?,
        };
        self.sync.activate(session.clone()).await?;
        Ok(session)
    }

    pub async fn close_session(&mut self) {
        self.sync.deactivate().await;
    }

    /// Reopens the push link of the open session if it gave up.
    pub async fn reconnect(&mut self) {
        self.sync.reconnect().await;
    }

    /// Re-fetches mode, stats and call history of the open session.
    pub async fn refresh_session(&self) {
        self.sync.refresh().await;
    }

    /// Switches the open session to another mode.
    pub async fn switch_mode(
        &self,
        mode: &str,
        config: Option<&ModeConfig>,
    ) -> ClientResult<SessionMode> {
        let session_id = self
            .sync
            .active_id()
            .ok_or(ClientError::NoActiveSession)?
            .to_string();
        let updated = self.api.set_session_mode(&session_id, mode, config).await?;
        self.store.dispatch(Event::SessionModeLoaded {
            session_id,
            mode: updated.clone(),
        });
        Ok(updated)
    }

    /// Feeds one key press to the composer.
    ///
    /// Returns the submission when the key sends the message; the composer
    /// keeps its text until [`CafeClient::submit`] succeeds.
    pub fn press_key(&self, key: Key) -> Option<Submission> {
        let state = self.store.state();
        match state.composer.handle_key(key, &state.participants) {
            KeyOutcome::Updated(composer) => {
                self.store.dispatch(Event::ComposerChanged(composer));
                None
            }
            KeyOutcome::Submit(submission) => Some(submission),
        }
    }

    /// Sends a submission and clears the composer on success.
    pub async fn submit(&self, submission: &Submission) -> ClientResult<Message> {
        let message = self.sync.send(submission).await?;
        let cleared = self.store.state().composer.cleared();
        self.store.dispatch(Event::ComposerChanged(cleared));
        Ok(message)
    }

    /// Call history of the open session, arranged per the configured
    /// display.
    pub fn history_groups(&self) -> Vec<HistoryGroup> {
        history::arrange(&self.store.state().call_history, self.config.history_display)
    }

    /// Closes the open session and releases its resources.
    pub async fn shutdown(&mut self) {
        self.sync.deactivate().await;
    }
}
