//! Domain layer: connection identity, agent verbs, and transaction records.
//!
//! These types are shared by the protocol extractors, the command
//! handlers, and the backend ports.

pub mod agent;
pub mod connection_id;
pub mod session;
pub mod transaction;

pub use agent::{AgentCommand, AgentStatus};
pub use connection_id::ConnectionId;
pub use session::Session;
pub use transaction::TransactionRecord;
