//! Command dispatcher: decoded envelope → handler → frame.
//!
//! [`Dispatcher`] is stateless between calls. It touches the session's
//! last-activity timestamp for every decoded envelope, resolves the tag,
//! validates the payload once, and routes to the matching handler. Every
//! request except `pong` is answered with exactly one frame.

use std::sync::Arc;

use super::{SubscriptionRegistry, handlers};
use crate::backend::{
    AgentController, StatusNotifier, StubAgentController, SyntheticLedger, TransactionLedger,
};
use crate::domain::Session;
use crate::error::ProtocolError;
use crate::protocol::{Command, Envelope, Frame};

/// Routes client messages to command handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<SubscriptionRegistry>,
    notifier: Arc<dyn StatusNotifier>,
    agents: Arc<dyn AgentController>,
    ledger: Arc<dyn TransactionLedger>,
}

impl Dispatcher {
    /// Creates a dispatcher over explicit backend ports.
    #[must_use]
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        notifier: Arc<dyn StatusNotifier>,
        agents: Arc<dyn AgentController>,
        ledger: Arc<dyn TransactionLedger>,
    ) -> Self {
        Self {
            registry,
            notifier,
            agents,
            ledger,
        }
    }

    /// Creates a dispatcher that broadcasts through `registry` and uses the
    /// stub agent controller and synthetic ledger.
    #[must_use]
    pub fn with_stub_backends(registry: Arc<SubscriptionRegistry>) -> Self {
        let broadcaster = Arc::clone(&registry);
        let notifier: Arc<dyn StatusNotifier> = broadcaster;
        Self::new(
            registry,
            notifier,
            Arc::new(StubAgentController),
            Arc::new(SyntheticLedger),
        )
    }

    /// Returns the subscription registry handlers mutate.
    #[must_use]
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    /// Decodes and handles one raw inbound message.
    ///
    /// Returns the frame to send back, or `None` when the message needs no
    /// answer (`pong`).
    pub fn dispatch(&self, session: &mut Session, raw: &[u8]) -> Option<Frame> {
        match Envelope::decode(raw) {
            Ok(envelope) => self.handle_envelope(session, &envelope),
            Err(err) => {
                tracing::warn!(conn_id = %session.id(), %err, "failed to decode client message");
                Some(ProtocolError::InvalidFormat.into_frame())
            }
        }
    }

    /// Handles an already-decoded envelope.
    pub fn handle_envelope(&self, session: &mut Session, envelope: &Envelope) -> Option<Frame> {
        session.touch();
        let command = envelope
            .command_tag()
            .and_then(|tag| Command::extract(tag, &envelope.payload));
        match command {
            Ok(command) => self.route(session, command),
            Err(err) => {
                tracing::warn!(
                    conn_id = %session.id(),
                    tag = %envelope.tag,
                    %err,
                    "rejected client message"
                );
                Some(err.into_frame())
            }
        }
    }

    fn route(&self, session: &Session, command: Command) -> Option<Frame> {
        let result = match command {
            Command::Subscribe(req) => Ok(handlers::subscribe(&self.registry, session.id(), req)),
            Command::Unsubscribe(req) => {
                Ok(handlers::unsubscribe(&self.registry, session.id(), req))
            }
            Command::AgentControl(req) => {
                handlers::agent_control(self.agents.as_ref(), self.notifier.as_ref(), req)
            }
            Command::TransactionQuery(req) => {
                handlers::transaction_query(self.ledger.as_ref(), req)
            }
            Command::Pong => {
                tracing::debug!(conn_id = %session.id(), "received pong");
                return None;
            }
        };
        Some(result.unwrap_or_else(ProtocolError::into_frame))
    }
}
