// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the push channel.
//!
//! The push channel is receive-only: the server streams envelopes and the
//! client never writes to it. The trait exists so the transport manager can
//! run against a scripted transport in tests.

use std::future::Future;
use std::pin::Pin;

use cafe_core::Envelope;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The handshake did not complete.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// No socket is open.
    #[error("connection closed")]
    ConnectionClosed,

    /// The socket errored while reading.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// A frame arrived that is not a valid envelope. The socket is still
    /// usable.
    #[error("undecodable frame: {0}")]
    Decode(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// A connection that yields push envelopes.
pub trait Transport: Send {
    /// Opens the socket.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Closes the socket. Closing an already closed transport is fine.
    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    /// Waits for the next envelope.
    ///
    /// Returns `None` once the server closed the connection.
    fn recv(&mut self) -> TransportFuture<'_, Option<Envelope>>;

    fn is_connected(&self) -> bool;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Default)]
pub struct WebSocketTransport {
    ws: Option<WsStream>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            self.ws = Some(ws);
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                // Best effort; the peer may already be gone.
                let _ = ws.close(None).await;
            }
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<Envelope>> {
        Box::pin(async move {
            use futures_util::StreamExt;
            use tokio_tungstenite::tungstenite::Message;

            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return Envelope::from_json(&text)
                            .map(Some)
                            .map_err(|e| TransportError::Decode(e.to_string()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.ws = None;
                        return Ok(None);
                    }
                    // Ping/pong are answered by tungstenite; binary frames
                    // are not part of the protocol.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        self.ws = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
pub(crate) mod tests;
