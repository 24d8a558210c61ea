//! Outbound response, error, and event frames.

use serde::{Deserialize, Deserializer, Serialize};

use super::CommandTag;
use crate::error::CodecError;

/// `type` of every error frame.
pub const ERROR_FRAME_TYPE: &str = "error";

/// Outer wrapper around every server → client message.
///
/// Exactly one of `data` / `error` is set, gated by `success`. Absent
/// fields are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// `<tag>_response`, `error`, or an event type.
    #[serde(rename = "type")]
    pub frame_type: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result payload for successful frames. A present `null` stays
    /// `Some(Value::Null)`; only an absent field is `None`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<serde_json::Value>,
    /// Error details for failed frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Numeric code and human-readable message of an error frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
}

impl Frame {
    /// Builds the success frame answering `tag`.
    #[must_use]
    pub fn success(tag: CommandTag, data: serde_json::Value) -> Self {
        Self::event(tag.response_type(), data)
    }

    /// Builds a successful frame with an arbitrary type, used for
    /// server-initiated notifications.
    #[must_use]
    pub fn event(frame_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            frame_type: frame_type.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Builds an error frame.
    #[must_use]
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            frame_type: ERROR_FRAME_TYPE.to_string(),
            success: false,
            data: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
            }),
        }
    }

    /// Serializes the frame to its JSON text form.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the data payload is not
    /// serializable.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::Encode)
    }

    /// Parses a frame from its JSON text form.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the bytes are not a frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }
}

/// Deserializes a field that is present on the wire, keeping `null`.
/// Absence is handled by `#[serde(default)]`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}
