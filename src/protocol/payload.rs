//! Payload extractors: untyped JSON payloads → typed [`Command`]s.
//!
//! Validation happens exactly once, right after the tag has been resolved.
//! Handlers only ever see the typed requests defined here.

use serde_json::{Map, Value};

use super::CommandTag;
use crate::error::ProtocolError;

/// Limit applied to transaction queries that omit `limit` or send a
/// non-positive value.
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// A validated client command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a topic to the connection's subscriptions.
    Subscribe(TopicRequest),
    /// Remove a topic from the connection's subscriptions.
    Unsubscribe(TopicRequest),
    /// Apply a control verb to a remote agent.
    AgentControl(AgentControlRequest),
    /// Look up transactions by id or by agent.
    TransactionQuery(TransactionQueryRequest),
    /// Liveness acknowledgment.
    Pong,
}

/// Payload of `subscribe` / `unsubscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    /// Non-empty topic name.
    pub topic: String,
}

/// Payload of `agent_control`.
///
/// `command` is kept verbatim; resolving it to a known verb is the
/// handler's job.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentControlRequest {
    /// Non-empty agent identifier.
    pub agent_id: String,
    /// Non-empty control verb.
    pub command: String,
    /// Optional parameters, only meaningful for `update_config`.
    pub params: Option<Map<String, Value>>,
}

/// Payload of `transaction_query`.
///
/// At least one of `tx_id` / `agent_id` is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQueryRequest {
    /// Exact transaction to look up.
    pub tx_id: Option<String>,
    /// Agent whose recent transactions are requested.
    pub agent_id: Option<String>,
    /// Chain filter.
    pub blockchain: Option<String>,
    /// Requested number of records, always positive.
    pub limit: usize,
}

impl Command {
    /// Validates `payload` against the shape required by `tag`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] describing the first field that fails
    /// validation.
    pub fn extract(tag: CommandTag, payload: &Value) -> Result<Self, ProtocolError> {
        match tag {
            CommandTag::Subscribe => {
                TopicRequest::extract(payload, "subscribe").map(Self::Subscribe)
            }
            CommandTag::Unsubscribe => {
                TopicRequest::extract(payload, "unsubscribe").map(Self::Unsubscribe)
            }
            CommandTag::AgentControl => {
                AgentControlRequest::extract(payload).map(Self::AgentControl)
            }
            CommandTag::TransactionQuery => {
                TransactionQueryRequest::extract(payload).map(Self::TransactionQuery)
            }
            CommandTag::Pong => Ok(Self::Pong),
        }
    }

    /// Returns the tag this command was extracted for.
    #[must_use]
    pub const fn tag(&self) -> CommandTag {
        match self {
            Self::Subscribe(_) => CommandTag::Subscribe,
            Self::Unsubscribe(_) => CommandTag::Unsubscribe,
            Self::AgentControl(_) => CommandTag::AgentControl,
            Self::TransactionQuery(_) => CommandTag::TransactionQuery,
            Self::Pong => CommandTag::Pong,
        }
    }
}

impl TopicRequest {
    fn extract(payload: &Value, context: &'static str) -> Result<Self, ProtocolError> {
        let obj = as_object(payload, context)?;
        let topic = required_str(obj, "topic", context)?;
        Ok(Self { topic })
    }
}

impl AgentControlRequest {
    fn extract(payload: &Value) -> Result<Self, ProtocolError> {
        let obj = as_object(payload, "agent control")?;
        let agent_id = required_str(obj, "agent_id", "control")?;
        let command = required_str(obj, "command", "control")?;
        let params = obj.get("params").and_then(Value::as_object).cloned();
        Ok(Self {
            agent_id,
            command,
            params,
        })
    }
}

impl TransactionQueryRequest {
    fn extract(payload: &Value) -> Result<Self, ProtocolError> {
        let obj = as_object(payload, "transaction query")?;
        let tx_id = optional_str(obj, "tx_id");
        let agent_id = optional_str(obj, "agent_id");
        if tx_id.is_none() && agent_id.is_none() {
            return Err(ProtocolError::MissingTarget);
        }
        Ok(Self {
            tx_id,
            agent_id,
            blockchain: optional_str(obj, "blockchain"),
            limit: coerce_limit(obj.get("limit")),
        })
    }
}

fn as_object<'a>(
    payload: &'a Value,
    context: &'static str,
) -> Result<&'a Map<String, Value>, ProtocolError> {
    payload
        .as_object()
        .ok_or(ProtocolError::InvalidPayload(context))
}

fn required_str(
    obj: &Map<String, Value>,
    field: &'static str,
    context: &'static str,
) -> Result<String, ProtocolError> {
    optional_str(obj, field).ok_or(ProtocolError::InvalidField { field, context })
}

/// Returns the field as an owned string if it is a non-empty string.
/// Wrong types count as absent.
fn optional_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Truncates a numeric limit towards zero; anything that does not yield a
/// positive integer falls back to [`DEFAULT_QUERY_LIMIT`].
fn coerce_limit(value: Option<&Value>) -> usize {
    match value.and_then(Value::as_f64) {
        Some(n) if n >= 1.0 => n as usize,
        _ => DEFAULT_QUERY_LIMIT,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract_err(tag: CommandTag, payload: Value) -> String {
        match Command::extract(tag, &payload) {
            Ok(cmd) => panic!("expected error, got {cmd:?}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn subscribe_requires_non_empty_topic() {
        let Ok(cmd) = Command::extract(CommandTag::Subscribe, &json!({"topic": "agent-7"})) else {
            panic!("expected command");
        };
        assert_eq!(
            cmd,
            Command::Subscribe(TopicRequest {
                topic: "agent-7".to_string()
            })
        );

        for payload in [json!({}), json!({"topic": ""}), json!({"topic": 7})] {
            assert_eq!(
                extract_err(CommandTag::Subscribe, payload),
                "Missing or invalid topic in subscribe request"
            );
        }
    }

    #[test]
    fn non_object_payload_names_command() {
        assert_eq!(
            extract_err(CommandTag::Unsubscribe, json!("topic")),
            "Invalid unsubscribe payload"
        );
        assert_eq!(
            extract_err(CommandTag::AgentControl, Value::Null),
            "Invalid agent control payload"
        );
        assert_eq!(
            extract_err(CommandTag::TransactionQuery, json!([1])),
            "Invalid transaction query payload"
        );
    }

    #[test]
    fn unsubscribe_message_is_command_specific() {
        assert_eq!(
            extract_err(CommandTag::Unsubscribe, json!({"topic": null})),
            "Missing or invalid topic in unsubscribe request"
        );
    }

    #[test]
    fn agent_control_checks_agent_id_before_command() {
        assert_eq!(
            extract_err(CommandTag::AgentControl, json!({})),
            "Missing or invalid agent_id in control request"
        );
        assert_eq!(
            extract_err(CommandTag::AgentControl, json!({"agent_id": "a1", "command": ""})),
            "Missing or invalid command in control request"
        );
    }

    #[test]
    fn agent_control_keeps_unknown_verb_and_params() {
        let payload = json!({"agent_id": "a1", "command": "reboot", "params": {"k": 1}});
        let Ok(Command::AgentControl(req)) = Command::extract(CommandTag::AgentControl, &payload)
        else {
            panic!("expected agent control");
        };
        assert_eq!(req.command, "reboot");
        assert_eq!(req.params.and_then(|p| p.get("k").cloned()), Some(json!(1)));
    }

    #[test]
    fn transaction_query_requires_a_target() {
        for payload in [
            json!({}),
            json!({"tx_id": "", "agent_id": ""}),
            json!({"tx_id": 5, "blockchain": "Solana"}),
        ] {
            assert_eq!(
                extract_err(CommandTag::TransactionQuery, payload),
                "Must provide tx_id or agent_id for transaction query"
            );
        }
    }

    #[test]
    fn limit_is_truncated_and_defaulted() {
        let cases = [
            (json!({"agent_id": "a"}), DEFAULT_QUERY_LIMIT),
            (json!({"agent_id": "a", "limit": 0}), DEFAULT_QUERY_LIMIT),
            (json!({"agent_id": "a", "limit": -4}), DEFAULT_QUERY_LIMIT),
            (json!({"agent_id": "a", "limit": 0.7}), DEFAULT_QUERY_LIMIT),
            (json!({"agent_id": "a", "limit": "5"}), DEFAULT_QUERY_LIMIT),
            (json!({"agent_id": "a", "limit": 2.9}), 2),
            (json!({"agent_id": "a", "limit": 25}), 25),
        ];
        for (payload, expected) in cases {
            let Ok(Command::TransactionQuery(req)) =
                Command::extract(CommandTag::TransactionQuery, &payload)
            else {
                panic!("expected query for {payload}");
            };
            assert_eq!(req.limit, expected, "payload {payload}");
        }
    }

    #[test]
    fn pong_ignores_payload() {
        assert_eq!(
            Command::extract(CommandTag::Pong, &json!("anything")),
            Ok(Command::Pong)
        );
        assert_eq!(Command::Pong.tag(), CommandTag::Pong);
    }
}
