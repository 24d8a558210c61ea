//! Gateway error types with protocol error-frame mapping.
//!
//! [`ProtocolError`] covers every way a client request can be rejected.
//! Each variant maps to a numeric code and a human-readable message that
//! are sent back verbatim inside an `error` frame. [`CodecError`] covers
//! JSON encoding/decoding failures of the wire format itself.

use crate::protocol::Frame;

/// Numeric code used for every client-side protocol error.
pub const BAD_REQUEST: u16 = 400;

/// Client-facing protocol error.
///
/// # Error classes
///
/// | Class      | Variants                                        | Code |
/// |------------|-------------------------------------------------|------|
/// | Decode     | `InvalidFormat`                                 | 400  |
/// | Validation | `InvalidPayload`, `InvalidField`, `MissingTarget` | 400  |
/// | Semantic   | `UnknownMessageType`, `UnsupportedCommand`      | 400  |
///
/// There is no server-error class: every side effect behind the handlers
/// is synchronous and infallible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The envelope could not be decoded.
    #[error("Invalid message format")]
    InvalidFormat,

    /// The envelope `type` is not a recognized command tag.
    #[error("Unknown message type")]
    UnknownMessageType(String),

    /// The payload is not an object.
    #[error("Invalid {0} payload")]
    InvalidPayload(&'static str),

    /// A required string field is missing, empty, or of the wrong type.
    #[error("Missing or invalid {field} in {context} request")]
    InvalidField {
        /// Name of the offending payload field.
        field: &'static str,
        /// Short request description used in the message.
        context: &'static str,
    },

    /// A transaction query named neither a transaction nor an agent.
    #[error("Must provide tx_id or agent_id for transaction query")]
    MissingTarget,

    /// The agent control verb is well-formed but not implemented.
    #[error("Unsupported command")]
    UnsupportedCommand(String),
}

impl ProtocolError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidFormat
            | Self::UnknownMessageType(_)
            | Self::InvalidPayload(_)
            | Self::InvalidField { .. }
            | Self::MissingTarget
            | Self::UnsupportedCommand(_) => BAD_REQUEST,
        }
    }

    /// Converts the error into an `error` frame for the client.
    #[must_use]
    pub fn into_frame(self) -> Frame {
        Frame::error(self.code(), self.to_string())
    }
}

/// Failure to encode or decode a wire message.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Inbound bytes were not a well-formed message.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// An outbound frame could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
