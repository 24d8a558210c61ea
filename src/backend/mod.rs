//! Backend ports: the side effects command handlers delegate to.
//!
//! Handlers own validation and pagination policy; where records come from
//! and what "starting an agent" means is decided behind these traits. The
//! stub implementations here log and return fixed data so the protocol can
//! be exercised end to end.

pub mod agent_controller;
pub mod ledger;
pub mod notifier;

pub use agent_controller::{AgentController, StubAgentController};
pub use ledger::{SyntheticLedger, TransactionLedger};
pub use notifier::{AGENT_STATUS_UPDATE, StatusNotifier};
