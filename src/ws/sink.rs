//! Response sink: encodes frames and queues them for one connection.
//!
//! Writes are fire-and-forget. A frame that cannot be encoded, or that
//! finds the outbound queue full or closed, is logged and dropped.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::ConnectionId;
use crate::protocol::Frame;

/// Write handle for a single connection's outbound queue.
///
/// Cheap to clone; the subscription registry keeps one copy per connection
/// for broadcasts.
#[derive(Debug, Clone)]
pub struct ResponseSink {
    connection: ConnectionId,
    tx: mpsc::Sender<String>,
}

impl ResponseSink {
    /// Creates a sink with a bounded queue of `capacity` frames (at least 1)
    /// and returns the receiving end for the connection's write loop.
    #[must_use]
    pub fn channel(connection: ConnectionId, capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { connection, tx }, rx)
    }

    /// Returns the connection this sink writes to.
    #[must_use]
    pub const fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Encodes and queues `frame`. Returns `true` if it was queued.
    pub fn send(&self, frame: &Frame) -> bool {
        match frame.encode() {
            Ok(text) => self.send_encoded(text),
            Err(err) => {
                tracing::error!(conn_id = %self.connection, %err, "failed to encode frame");
                false
            }
        }
    }

    /// Queues an already-encoded frame. Returns `true` if it was queued.
    pub fn send_encoded(&self, text: String) -> bool {
        match self.tx.try_send(text) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.connection, "outbound queue full, dropping frame");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(conn_id = %self.connection, "connection closed, dropping frame");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn queued_frame_reaches_receiver() {
        let (sink, mut rx) = ResponseSink::channel(ConnectionId::new(), 4);
        assert!(sink.send(&Frame::error(400, "Unknown message type")));
        let Ok(text) = rx.try_recv() else {
            panic!("expected queued frame");
        };
        assert!(text.contains("Unknown message type"));
    }

    #[test]
    fn full_queue_drops_frame() {
        let (sink, _rx) = ResponseSink::channel(ConnectionId::new(), 1);
        assert!(sink.send_encoded("first".to_string()));
        assert!(!sink.send_encoded("second".to_string()));
    }

    #[test]
    fn closed_queue_drops_frame() {
        let (sink, rx) = ResponseSink::channel(ConnectionId::new(), 1);
        drop(rx);
        assert!(!sink.send(&Frame::error(400, "x")));
    }
}
