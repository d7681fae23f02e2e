// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-channel lifecycle.
//!
//! [`TransportManager`] owns at most one live link, bound to one session.
//! The link runs in a background task that connects, reads envelopes,
//! dispatches them to registered handlers, and reconnects with backoff as
//! directed by a [`Reconnector`]. Cancelling the task is the only way the
//! link stops before giving up.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use cafe_core::{
    CallHistory, CloseOutcome, Envelope, LinkState, Message, PushEvent, ReconnectPolicy,
    Reconnector,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::transport::{Transport, TransportError, WebSocketTransport};

type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;
type HistoryHandler = Arc<dyn Fn(Vec<CallHistory>) + Send + Sync>;
type LinkHandler = Arc<dyn Fn(LinkState) + Send + Sync>;

/// Registered callbacks, keyed by subscription id so they run in
/// registration order.
#[derive(Default)]
struct Handlers {
    next_id: u64,
    message: BTreeMap<u64, MessageHandler>,
    history: BTreeMap<u64, HistoryHandler>,
    link: BTreeMap<u64, LinkHandler>,
}

impl Handlers {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        self.message.remove(&id);
        self.history.remove(&id);
        self.link.remove(&id);
    }

    fn clear(&mut self) {
        self.message.clear();
        self.history.clear();
        self.link.clear();
    }
}

/// State shared between the manager and its link task.
#[derive(Default)]
struct Shared {
    handlers: Mutex<Handlers>,
    link: Mutex<LinkState>,
}

impl Shared {
    fn handlers(&self) -> MutexGuard<'_, Handlers> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn link(&self) -> LinkState {
        *self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_link(&self, state: LinkState) {
        *self.link.lock().unwrap_or_else(PoisonError::into_inner) = state;
        let targets: Vec<LinkHandler> = self.handlers().link.values().cloned().collect();
        for handler in targets {
            handler(state);
        }
    }

    fn dispatch(&self, envelope: Envelope) {
        match envelope.event {
            PushEvent::Message(message) => {
                let targets: Vec<MessageHandler> =
                    self.handlers().message.values().cloned().collect();
                debug!(id = %message.id, handlers = targets.len(), "push message");
                for handler in targets {
                    handler(message.clone());
                }
            }
            PushEvent::History(records) => {
                let targets: Vec<HistoryHandler> =
                    self.handlers().history.values().cloned().collect();
                debug!(records = records.len(), handlers = targets.len(), "push history");
                for handler in targets {
                    handler(records.clone());
                }
            }
            PushEvent::Ignored { kind } => {
                warn!(kind = %kind, "ignoring push event");
            }
        }
    }
}

/// Handle for a registered callback.
///
/// Dropping the handle unregisters the callback.
#[must_use = "dropping a Subscription unregisters its handler"]
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Subscription {
    /// Unregisters the callback. Safe to call after the manager is gone.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.handlers().remove(self.id);
        }
    }
}

/// Builds a fresh transport for each link.
pub type TransportFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

struct Link {
    session_id: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the push connection for the active session.
pub struct TransportManager<T: Transport + 'static = WebSocketTransport> {
    config: ClientConfig,
    factory: TransportFactory<T>,
    shared: Arc<Shared>,
    link: Option<Link>,
}

impl TransportManager<WebSocketTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_factory(config, Arc::new(WebSocketTransport::new))
    }
}

impl<T: Transport + 'static> TransportManager<T> {
    /// Creates a manager that builds its transports with `factory`.
    pub fn with_factory(config: ClientConfig, factory: TransportFactory<T>) -> Self {
        TransportManager {
            config,
            factory,
            shared: Arc::new(Shared::default()),
            link: None,
        }
    }

    /// Opens the push link for `session_id`.
    ///
    /// A no-op while a link for the same session is running. A link for any
    /// other session is torn down first. Only fails when the push URL
    /// cannot be built; connection failures go through the backoff loop.
    pub async fn connect(&mut self, session_id: &str) -> ClientResult<()> {
        if let Some(link) = &self.link {
            if link.session_id == session_id && !link.task.is_finished() {
                debug!(session_id, "push link already running");
                return Ok(());
            }
        }
        self.stop_link().await;

        let url = self.config.push_url(session_id)?;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_link(
            (self.factory)(),
            url,
            self.config.reconnect_policy(),
            Arc::clone(&self.shared),
            cancel.clone(),
        ));
        self.link = Some(Link {
            session_id: session_id.to_string(),
            cancel,
            task,
        });
        Ok(())
    }

    /// Closes the link and unregisters every handler.
    ///
    /// Once this returns no handler registered before the call runs again.
    pub async fn disconnect(&mut self) {
        self.shared.handlers().clear();
        self.stop_link().await;
        *self.shared.link.lock().unwrap_or_else(PoisonError::into_inner) = LinkState::Idle;
    }

    async fn stop_link(&mut self) {
        if let Some(link) = self.link.take() {
            link.cancel.cancel();
            if let Err(e) = link.task.await {
                warn!(error = %e, "push link task failed");
            }
        }
    }

    /// True while the link is open.
    pub fn is_connected(&self) -> bool {
        self.shared.link().is_live()
    }

    pub fn state(&self) -> LinkState {
        self.shared.link()
    }

    /// Session the link is bound to, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.session_id.as_str())
    }

    pub fn on_message(&self, handler: impl Fn(Message) + Send + Sync + 'static) -> Subscription {
        let mut handlers = self.shared.handlers();
        let id = handlers.next_id();
        handlers.message.insert(id, Arc::new(handler));
        self.subscription(id)
    }

    pub fn on_history(
        &self,
        handler: impl Fn(Vec<CallHistory>) + Send + Sync + 'static,
    ) -> Subscription {
        let mut handlers = self.shared.handlers();
        let id = handlers.next_id();
        handlers.history.insert(id, Arc::new(handler));
        self.subscription(id)
    }

    /// Called on every link state change.
    pub fn on_link(&self, handler: impl Fn(LinkState) + Send + Sync + 'static) -> Subscription {
        let mut handlers = self.shared.handlers();
        let id = handlers.next_id();
        handlers.link.insert(id, Arc::new(handler));
        self.subscription(id)
    }

    fn subscription(&self, id: u64) -> Subscription {
        Subscription {
            shared: Arc::downgrade(&self.shared),
            id,
        }
    }
}

impl<T: Transport + 'static> Drop for TransportManager<T> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            link.cancel.cancel();
        }
    }
}

/// Why a single connection ended.
enum Ended {
    Cancelled,
    Closed,
}

/// Connects, reads until the socket closes, and retries per `policy`.
async fn run_link<T: Transport>(
    mut transport: T,
    url: String,
    policy: ReconnectPolicy,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) {
    let mut reconnector = Reconnector::new(policy);
    reconnector.connect();

    loop {
        shared.set_link(reconnector.state());
        debug!(url = %url, attempt = reconnector.attempts(), "opening push link");

        let connected = tokio::select! {
            _ = cancel.cancelled() => break,
            result = transport.connect(&url) => result,
        };

        match connected {
            Ok(()) => {
                reconnector.opened();
                shared.set_link(reconnector.state());
                info!(url = %url, "push link open");
                if let Ended::Cancelled = pump(&mut transport, &shared, &cancel).await {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "push link failed to open"),
        }

        match reconnector.closed() {
            CloseOutcome::Retry(delay) => {
                shared.set_link(reconnector.state());
                debug!(delay_ms = delay.as_millis() as u64, "push link retry scheduled");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                reconnector.retry_due();
            }
            CloseOutcome::GiveUp => {
                error!(
                    attempts = reconnector.attempts(),
                    "push link gave up; falling back to polling"
                );
                shared.set_link(reconnector.state());
                return;
            }
            CloseOutcome::Ignored => return,
        }
    }

    if let Err(e) = transport.disconnect().await {
        debug!(error = %e, "push link close failed");
    }
    debug!(url = %url, "push link closed");
}

/// Reads envelopes until the socket closes or the link is cancelled.
async fn pump<T: Transport>(
    transport: &mut T,
    shared: &Shared,
    cancel: &CancellationToken,
) -> Ended {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => return Ended::Cancelled,
            frame = transport.recv() => frame,
        };
        match frame {
            Ok(Some(envelope)) => {
                if cancel.is_cancelled() {
                    return Ended::Cancelled;
                }
                shared.dispatch(envelope);
            }
            Ok(None) => {
                info!("push link closed by server");
                return Ended::Closed;
            }
            Err(TransportError::Decode(e)) => warn!(error = %e, "dropping push frame"),
            Err(e) => {
                warn!(error = %e, "push link errored");
                if let Err(e) = transport.disconnect().await {
                    debug!(error = %e, "push link close failed");
                }
                return Ended::Closed;
            }
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
