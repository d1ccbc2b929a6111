//! Realtime dispatcher: owns the single WebSocket connection.
//!
//! Exactly one connection handle exists at a time, owned exclusively by
//! the dispatcher. A monotonically increasing generation counter pairs
//! every reader task with the connection it was spawned for, so frames
//! arriving after a disconnect are rejected by identity check instead of
//! being forwarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::channels::EventChannels;
use super::event::{Channel, InboundEvent, RealtimeNotification};
use super::state::ConnectionState;
use crate::error::RealtimeError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Owns the realtime connection and fans traffic to the named channels.
///
/// All interaction goes through [`connect`](Self::connect),
/// [`send`](Self::send), [`disconnect`](Self::disconnect), and the
/// subscription methods; no other component ever holds the transport.
#[derive(Debug, Clone)]
pub struct RealtimeDispatcher {
    channels: EventChannels,
    state: Arc<RwLock<ConnectionState>>,
    writer: Arc<Mutex<Option<WsSink>>>,
    generation: Arc<AtomicU64>,
}

impl RealtimeDispatcher {
    /// Creates a disconnected dispatcher with the given channel capacity.
    #[must_use]
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: EventChannels::new(channel_capacity),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            writer: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Opens a connection to the given WebSocket URL.
    ///
    /// At most one connection is live at a time: an existing one is
    /// closed before the new handshake starts. On success a reader task
    /// is spawned and an [`RealtimeNotification::Opened`] notification is
    /// published.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Handshake`] when the connection cannot be
    /// established; the dispatcher is left `Disconnected`.
    pub async fn connect(&self, url: &str) -> Result<(), RealtimeError> {
        if self.state().await.is_live() {
            tracing::debug!("closing previous connection before reconnect");
            self.disconnect().await;
        }

        self.set_state(ConnectionState::Connecting).await;
        tracing::info!(url, "realtime connecting");

        let (stream, _response) = match connect_async(url).await {
            Ok(pair) => pair,
            Err(e) => {
                self.set_state(ConnectionState::Disconnected).await;
                self.channels
                    .publish_lifecycle(RealtimeNotification::TransportError {
                        message: e.to_string(),
                    });
                return Err(RealtimeError::Handshake(e.to_string()));
            }
        };

        let (sink, source) = stream.split();
        {
            let mut writer = self.writer.lock().await;
            *writer = Some(sink);
        }
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ConnectionState::Open).await;
        self.channels.publish_lifecycle(RealtimeNotification::Opened);

        let channels = self.channels.clone();
        let state = Arc::clone(&self.state);
        let writer = Arc::clone(&self.writer);
        let generation = Arc::clone(&self.generation);
        tokio::spawn(async move {
            run_reader(source, channels, state, writer, generation, my_generation).await;
        });

        Ok(())
    }

    /// Serializes and transmits a message over the live connection.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::ConnectionAbsent`] when no connection is
    /// open, [`RealtimeError::Serialize`] when the payload cannot be
    /// encoded, and [`RealtimeError::Transport`] when the send fails.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<(), RealtimeError> {
        if !self.state().await.can_send() {
            return Err(RealtimeError::ConnectionAbsent);
        }
        let json =
            serde_json::to_string(message).map_err(|e| RealtimeError::Serialize(e.to_string()))?;

        let mut writer = self.writer.lock().await;
        let Some(sink) = writer.as_mut() else {
            return Err(RealtimeError::ConnectionAbsent);
        };
        sink.send(Message::Text(json.into()))
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))
    }

    /// Closes the owned connection, if any.
    ///
    /// Idempotent: returns `true` when a live connection was closed and
    /// `false` when there was nothing to close; neither case is an error.
    /// The generation counter is bumped first, so a reader still draining
    /// the old stream drops its frames instead of forwarding them.
    pub async fn disconnect(&self) -> bool {
        let mut writer = self.writer.lock().await;
        let Some(mut sink) = writer.take() else {
            self.set_state(ConnectionState::Disconnected).await;
            return false;
        };

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.set_state(ConnectionState::Closing).await;

        let _ = sink.send(Message::Close(None)).await;
        let _ = sink.close().await;
        drop(writer);

        self.set_state(ConnectionState::Disconnected).await;
        self.channels
            .publish_lifecycle(RealtimeNotification::Closed {
                code: None,
                reason: None,
            });
        tracing::info!("realtime disconnected");
        true
    }

    /// Subscribes to one named channel.
    #[must_use]
    pub fn subscribe(&self, channel: Channel) -> tokio::sync::broadcast::Receiver<InboundEvent> {
        self.channels.subscribe(channel)
    }

    /// Subscribes to lifecycle and error notifications.
    #[must_use]
    pub fn subscribe_lifecycle(
        &self,
    ) -> tokio::sync::broadcast::Receiver<RealtimeNotification> {
        self.channels.subscribe_lifecycle()
    }

    /// Returns the current connection state.
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Returns `true` while the connection accepts outbound sends.
    pub async fn is_connected(&self) -> bool {
        self.state().await.can_send()
    }

    /// Returns the underlying channel set (shared with the bridge layer).
    #[must_use]
    pub const fn channels(&self) -> &EventChannels {
        &self.channels
    }

    async fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write().await;
        *state = next;
    }
}

/// Read loop for one connection generation.
///
/// Frames are classified and published in receipt order. The loop exits
/// on close, transport error, or when its generation is superseded.
async fn run_reader(
    mut source: WsSource,
    channels: EventChannels,
    state: Arc<RwLock<ConnectionState>>,
    writer: Arc<Mutex<Option<WsSink>>>,
    generation: Arc<AtomicU64>,
    my_generation: u64,
) {
    while let Some(frame) = source.next().await {
        if generation.load(Ordering::SeqCst) != my_generation {
            // A disconnect or reconnect superseded this connection.
            tracing::debug!("dropping frame from superseded connection");
            return;
        }

        match frame {
            Ok(Message::Text(text)) => {
                {
                    let mut guard = state.write().await;
                    if *guard == ConnectionState::Open {
                        *guard = ConnectionState::Receiving;
                    }
                }
                match InboundEvent::parse(text.as_str()) {
                    Ok(event) => {
                        tracing::debug!(tag = %event.tag, channel = event.channel.as_str(), "event received");
                        channels.publish_event(event);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "inbound frame failed to parse");
                        channels.publish_lifecycle(RealtimeNotification::ParseFailure {
                            raw: text.to_string(),
                            error: e.to_string(),
                        });
                    }
                }
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = match frame {
                    Some(f) => (Some(u16::from(f.code)), Some(f.reason.to_string())),
                    None => (None, None),
                };
                finish_reader(
                    &channels,
                    &state,
                    &writer,
                    &generation,
                    my_generation,
                    RealtimeNotification::Closed { code, reason },
                )
                .await;
                return;
            }
            Ok(_) => {
                // Ping/pong are answered by the protocol stack; binary
                // frames are not part of the event feed.
            }
            Err(e) => {
                tracing::warn!(error = %e, "realtime transport failure");
                finish_reader(
                    &channels,
                    &state,
                    &writer,
                    &generation,
                    my_generation,
                    RealtimeNotification::TransportError {
                        message: e.to_string(),
                    },
                )
                .await;
                return;
            }
        }
    }

    // Stream ended without a close frame.
    finish_reader(
        &channels,
        &state,
        &writer,
        &generation,
        my_generation,
        RealtimeNotification::Closed {
            code: None,
            reason: None,
        },
    )
    .await;
}

/// Tears down dispatcher state from the reader side, unless superseded.
async fn finish_reader(
    channels: &EventChannels,
    state: &Arc<RwLock<ConnectionState>>,
    writer: &Arc<Mutex<Option<WsSink>>>,
    generation: &Arc<AtomicU64>,
    my_generation: u64,
    notification: RealtimeNotification,
) {
    if generation.load(Ordering::SeqCst) != my_generation {
        return;
    }
    generation.fetch_add(1, Ordering::SeqCst);
    {
        let mut guard = writer.lock().await;
        *guard = None;
    }
    {
        let mut guard = state.write().await;
        *guard = ConnectionState::Disconnected;
    }
    channels.publish_lifecycle(notification);
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_disconnected() {
        let dispatcher = RealtimeDispatcher::new(16);
        assert_eq!(dispatcher.state().await, ConnectionState::Disconnected);
        assert!(!dispatcher.is_connected().await);
    }

    #[tokio::test]
    async fn send_without_connection_is_rejected() {
        let dispatcher = RealtimeDispatcher::new(16);
        let result = dispatcher.send(&serde_json::json!({"type": "chat"})).await;
        assert!(matches!(result, Err(RealtimeError::ConnectionAbsent)));
    }

    #[tokio::test]
    async fn disconnect_without_connection_reports_trivial_success() {
        let dispatcher = RealtimeDispatcher::new(16);
        assert!(!dispatcher.disconnect().await);
        assert_eq!(dispatcher.state().await, ConnectionState::Disconnected);
        // A second call is equally harmless.
        assert!(!dispatcher.disconnect().await);
    }

    #[tokio::test]
    async fn connect_to_unreachable_endpoint_surfaces_handshake_error() {
        let dispatcher = RealtimeDispatcher::new(16);
        let mut lifecycle = dispatcher.subscribe_lifecycle();

        let result = dispatcher.connect("ws://127.0.0.1:1/ws").await;
        assert!(matches!(result, Err(RealtimeError::Handshake(_))));
        assert_eq!(dispatcher.state().await, ConnectionState::Disconnected);

        let Ok(notification) = lifecycle.recv().await else {
            panic!("lifecycle notification expected");
        };
        assert!(matches!(
            notification,
            RealtimeNotification::TransportError { .. }
        ));
    }
}
