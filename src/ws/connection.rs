//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! inbound messages are dispatched one at a time, queued outbound frames
//! (responses and broadcasts) are written in order, and a heartbeat
//! pings the client and closes idle connections.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::time::MissedTickBehavior;

use super::{Dispatcher, ResponseSink};
use crate::domain::{ConnectionId, Session};

/// Per-connection tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Capacity of the outbound frame queue.
    pub outbound_capacity: usize,
    /// Interval between server pings.
    pub ping_interval: Duration,
    /// Close the connection after this long without inbound activity.
    pub idle_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            outbound_capacity: 256,
            ping_interval: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the subscription registry.
/// - Reads messages from the client and dispatches them sequentially.
/// - Writes queued frames to the client.
/// - Pings on every heartbeat tick and closes idle connections.
/// - Unregisters the connection (dropping its topics) on exit.
pub async fn run_connection(
    socket: WebSocket,
    dispatcher: Arc<Dispatcher>,
    settings: ConnectionSettings,
) {
    let conn_id = ConnectionId::new();
    let (sink, mut outbound_rx) = ResponseSink::channel(conn_id, settings.outbound_capacity);
    let registry = Arc::clone(dispatcher.registry());
    registry.register(sink.clone());
    let mut session = Session::new(conn_id);
    tracing::info!(%conn_id, "ws connection opened");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut heartbeat = tokio::time::interval(settings.ping_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let raw = text.as_str().as_bytes();
                        if let Some(frame) = dispatcher.dispatch(&mut session, raw) {
                            sink.send(&frame);
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => {
                        if let Some(frame) = dispatcher.dispatch(&mut session, &bytes) {
                            sink.send(&frame);
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => session.touch(),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%conn_id, %err, "ws read failed");
                        break;
                    }
                }
            }
            // Queued response or broadcast
            Some(text) = outbound_rx.recv() => {
                if let Err(err) = ws_tx.send(Message::text(text)).await {
                    tracing::debug!(%conn_id, %err, "ws write failed");
                    break;
                }
            }
            // Heartbeat
            _ = heartbeat.tick() => {
                let idle = session.idle_for(Utc::now());
                if idle >= settings.idle_timeout {
                    tracing::info!(
                        %conn_id,
                        idle_secs = idle.as_secs(),
                        "closing idle ws connection"
                    );
                    break;
                }
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let dropped_topics = registry.unregister(conn_id);
    let _ = ws_tx.close().await;
    tracing::info!(%conn_id, dropped_topics, "ws connection closed");
}
