//! Agent status notification port.
//!
//! The registry-backed implementation pushes an `agent_status_update`
//! frame to every connection subscribed to the agent's id.

use std::fmt;

use chrono::Utc;
use serde_json::json;

use crate::domain::AgentStatus;
use crate::protocol::Frame;
use crate::ws::SubscriptionRegistry;

/// Frame type of server-initiated agent status updates.
pub const AGENT_STATUS_UPDATE: &str = "agent_status_update";

/// Notifies topic subscribers about agent status changes.
pub trait StatusNotifier: Send + Sync + fmt::Debug {
    /// Broadcasts `status` for `agent_id`. Returns the number of
    /// connections notified.
    fn notify_agent_status(&self, agent_id: &str, status: AgentStatus, message: &str) -> usize;
}

impl StatusNotifier for SubscriptionRegistry {
    fn notify_agent_status(&self, agent_id: &str, status: AgentStatus, message: &str) -> usize {
        let frame = Frame::event(
            AGENT_STATUS_UPDATE,
            json!({
                "agent_id": agent_id,
                "status": status,
                "message": message,
                "timestamp": Utc::now(),
            }),
        );
        let delivered = self.publish(agent_id, &frame);
        tracing::debug!(agent_id, %status, delivered, "agent status broadcast");
        delivered
    }
}
