//! Inbound message envelope and command tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, ProtocolError};

/// Outer wrapper around every inbound client message.
///
/// The tag is kept as a raw string so that an unrecognized `type` can be
/// told apart from a malformed message: the former is a semantic error,
/// the latter a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Command tag as sent by the client.
    #[serde(rename = "type")]
    pub tag: String,
    /// Untyped command payload. Absent payloads decode as `null`.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Decodes an envelope from raw frame bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the bytes are not a JSON object
    /// with a string `type` field.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }

    /// Resolves the raw tag into a [`CommandTag`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownMessageType`] for unrecognized tags.
    pub fn command_tag(&self) -> Result<CommandTag, ProtocolError> {
        self.tag.parse()
    }
}

/// Closed set of commands a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandTag {
    /// Subscribe to a topic.
    Subscribe,
    /// Unsubscribe from a topic.
    Unsubscribe,
    /// Control a remote agent.
    AgentControl,
    /// Look up transactions.
    TransactionQuery,
    /// Liveness acknowledgment.
    Pong,
}

impl CommandTag {
    /// Returns the wire name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::AgentControl => "agent_control",
            Self::TransactionQuery => "transaction_query",
            Self::Pong => "pong",
        }
    }

    /// Returns the `type` of the success frame answering this command.
    #[must_use]
    pub fn response_type(self) -> String {
        format!("{}_response", self.as_str())
    }
}

impl FromStr for CommandTag {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribe" => Ok(Self::Subscribe),
            "unsubscribe" => Ok(Self::Unsubscribe),
            "agent_control" => Ok(Self::AgentControl),
            "transaction_query" => Ok(Self::TransactionQuery),
            "pong" => Ok(Self::Pong),
            other => Err(ProtocolError::UnknownMessageType(other.to_string())),
        }
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
