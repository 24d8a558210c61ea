//! Per-connection session state owned by the connection task.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::ConnectionId;

/// State the core reads and mutates for one connection.
///
/// The transport handle itself is owned by the connection loop; the topic
/// set lives in the [`SubscriptionRegistry`](crate::ws::SubscriptionRegistry).
#[derive(Debug, Clone)]
pub struct Session {
    id: ConnectionId,
    last_active: DateTime<Utc>,
}

impl Session {
    /// Starts a session for `id`, marking it active now.
    #[must_use]
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            last_active: Utc::now(),
        }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns the last time inbound activity was seen.
    #[must_use]
    pub const fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Records inbound activity at the current time.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Returns how long the connection has been silent as of `now`.
    ///
    /// Clock skew that puts `now` before the last activity counts as zero.
    #[must_use]
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_active).to_std().unwrap_or_default()
    }
}
