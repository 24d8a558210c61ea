//! Wire protocol: inbound envelopes, outbound frames, and typed commands.
//!
//! Every client message is a JSON text frame of the shape
//! `{"type": "<tag>", "payload": {...}}`. Every server message is a
//! [`Frame`]: `{"type", "success", "data"?, "error"?}`.

pub mod envelope;
pub mod frame;
pub mod payload;

pub use envelope::{CommandTag, Envelope};
pub use frame::{ErrorBody, Frame};
pub use payload::{AgentControlRequest, Command, TopicRequest, TransactionQueryRequest};
