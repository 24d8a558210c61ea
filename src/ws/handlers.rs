//! Command handlers: one per command, each producing a response frame.
//!
//! Handlers receive already-validated requests. The only failure left at
//! this stage is semantic (an unsupported agent verb); everything else
//! resolves into a success frame.

use serde_json::json;

use super::SubscriptionRegistry;
use crate::backend::{AgentController, StatusNotifier, TransactionLedger};
use crate::domain::{AgentCommand, ConnectionId};
use crate::error::ProtocolError;
use crate::protocol::{
    AgentControlRequest, CommandTag, Frame, TopicRequest, TransactionQueryRequest,
};

/// Most records a by-agent transaction query returns, regardless of the
/// requested limit.
pub const MAX_AGENT_TRANSACTIONS: usize = 3;

/// Message attached to status broadcasts triggered by `agent_control`.
pub const COMMAND_PROCESSED: &str = "Command processed";

/// Adds the topic to the connection's subscriptions.
pub fn subscribe(registry: &SubscriptionRegistry, conn: ConnectionId, req: TopicRequest) -> Frame {
    let added = registry.subscribe(conn, &req.topic);
    tracing::info!(conn_id = %conn, topic = %req.topic, added, "client subscribed");
    Frame::success(CommandTag::Subscribe, json!({ "topic": req.topic }))
}

/// Removes the topic from the connection's subscriptions.
pub fn unsubscribe(
    registry: &SubscriptionRegistry,
    conn: ConnectionId,
    req: TopicRequest,
) -> Frame {
    let removed = registry.unsubscribe(conn, &req.topic);
    tracing::info!(conn_id = %conn, topic = %req.topic, removed, "client unsubscribed");
    Frame::success(CommandTag::Unsubscribe, json!({ "topic": req.topic }))
}

/// Applies a control verb to an agent and broadcasts its new status.
///
/// # Errors
///
/// Returns [`ProtocolError::UnsupportedCommand`] if the verb is not one of
/// `start`, `stop`, `update_config`. No broadcast happens in that case.
pub fn agent_control(
    agents: &dyn AgentController,
    notifier: &dyn StatusNotifier,
    req: AgentControlRequest,
) -> Result<Frame, ProtocolError> {
    let command: AgentCommand = req.command.parse().inspect_err(|_| {
        tracing::warn!(
            agent_id = %req.agent_id,
            command = %req.command,
            "unsupported agent command"
        );
    })?;

    tracing::info!(agent_id = %req.agent_id, %command, "processing agent control command");
    let status = agents.execute(&req.agent_id, command, req.params.as_ref());
    notifier.notify_agent_status(&req.agent_id, status, COMMAND_PROCESSED);

    Ok(Frame::success(
        CommandTag::AgentControl,
        json!({
            "agent_id": req.agent_id,
            "command": command,
            "status": status,
        }),
    ))
}

/// Looks up transactions by id, or the most recent ones for an agent.
///
/// A `tx_id` always yields exactly one record. Otherwise at most
/// [`MAX_AGENT_TRANSACTIONS`] records are returned for the agent.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingTarget`] if the request names neither a
/// transaction nor an agent. The ledger is not consulted in that case.
pub fn transaction_query(
    ledger: &dyn TransactionLedger,
    req: TransactionQueryRequest,
) -> Result<Frame, ProtocolError> {
    tracing::info!(
        tx_id = ?req.tx_id,
        agent_id = ?req.agent_id,
        blockchain = ?req.blockchain,
        limit = req.limit,
        "querying transactions"
    );

    let blockchain = req.blockchain.as_deref();
    let transactions = match (&req.tx_id, &req.agent_id) {
        (Some(tx_id), _) => vec![ledger.find_by_id(tx_id, blockchain)],
        (None, Some(agent_id)) => {
            let limit = req.limit.min(MAX_AGENT_TRANSACTIONS);
            let mut records = ledger.recent_for_agent(agent_id, blockchain, limit);
            records.truncate(limit);
            records
        }
        (None, None) => return Err(ProtocolError::MissingTarget),
    };

    let count = transactions.len();
    tracing::debug!(count, "transaction query answered");
    Ok(Frame::success(
        CommandTag::TransactionQuery,
        json!({ "transactions": transactions, "count": count }),
    ))
}
