// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pull path.
//!
//! A poller re-fetches the whole timeline of one session on a cadence that
//! tightens while a reply is pending. Each fetch takes a sequence number
//! from the store before it starts, so a response that completes after a
//! newer one is discarded by the reducer.

use std::sync::Arc;

use cafe_core::{Event, PollCadence, Store};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::TimelineSource;

/// Handle to a running poller. Dropping it stops the poller.
pub struct PollHandle {
    session_id: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Stops the poller and waits for it to exit. No fetch starts after
    /// this returns.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "poller task failed");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts polling `session_id`. The first fetch happens immediately.
pub fn start_polling<S: TimelineSource>(
    source: Arc<S>,
    store: Store,
    session_id: impl Into<String>,
    cadence: PollCadence,
) -> PollHandle {
    let session_id = session_id.into();
    let cancel = CancellationToken::new();
    let task = tokio::spawn(poll_loop(
        source,
        store,
        session_id.clone(),
        cadence,
        cancel.clone(),
    ));
    PollHandle {
        session_id,
        cancel,
        task: Some(task),
    }
}

async fn poll_loop<S: TimelineSource>(
    source: Arc<S>,
    store: Store,
    session_id: String,
    cadence: PollCadence,
    cancel: CancellationToken,
) {
    loop {
        let seq = store.next_pull_seq();
        let fetched = tokio::select! {
            _ = cancel.cancelled() => break,
            fetched = source.fetch_timeline(&session_id) => fetched,
        };
        match fetched {
            Ok(messages) => {
                debug!(session_id = %session_id, seq, count = messages.len(), "timeline pulled");
                store.dispatch(Event::TimelinePulled {
                    session_id: session_id.clone(),
                    seq,
                    messages,
                });
            }
            Err(e) => warn!(session_id = %session_id, error = %e, "timeline pull failed"),
        }

        let interval = cadence.interval(store.state().reply_pending);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!(session_id = %session_id, "poller stopped");
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
