//! Transaction ledger port and its synthetic implementation.

use std::fmt;

use chrono::{Duration, Utc};

use crate::domain::TransactionRecord;

/// Read-only access to transaction history.
pub trait TransactionLedger: Send + Sync + fmt::Debug {
    /// Returns the record for `tx_id`.
    fn find_by_id(&self, tx_id: &str, blockchain: Option<&str>) -> TransactionRecord;

    /// Returns at most `limit` records for `agent_id`, most recent first.
    fn recent_for_agent(
        &self,
        agent_id: &str,
        blockchain: Option<&str>,
        limit: usize,
    ) -> Vec<TransactionRecord>;
}

/// Chain reported when the query does not name one.
pub const DEFAULT_BLOCKCHAIN: &str = "Solana";

/// Ledger that fabricates plausible confirmed transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticLedger;

impl SyntheticLedger {
    fn record(
        tx_id: String,
        amount: &str,
        blockchain: Option<&str>,
        age: Duration,
    ) -> TransactionRecord {
        TransactionRecord {
            tx_id,
            status: "confirmed".to_string(),
            timestamp: Utc::now() - age,
            amount: amount.to_string(),
            blockchain: blockchain.unwrap_or(DEFAULT_BLOCKCHAIN).to_string(),
            from_address: "addr1".to_string(),
            to_address: "addr2".to_string(),
        }
    }
}

impl TransactionLedger for SyntheticLedger {
    fn find_by_id(&self, tx_id: &str, blockchain: Option<&str>) -> TransactionRecord {
        Self::record(tx_id.to_string(), "0.5 SOL", blockchain, Duration::minutes(10))
    }

    fn recent_for_agent(
        &self,
        agent_id: &str,
        blockchain: Option<&str>,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        (0..limit)
            .map(|i| {
                let hours = i64::try_from(i).unwrap_or(i64::MAX).saturating_add(1);
                Self::record(
                    format!("tx-{agent_id}-{i}"),
                    "0.1 SOL",
                    blockchain,
                    Duration::hours(hours),
                )
            })
            .collect()
    }
}
