//! Transaction records returned by `transaction_query`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single ledger transaction as exposed on the wire.
///
/// Read-only result shape; the record's origin (synthetic or a real ledger)
/// is decided by the [`TransactionLedger`](crate::backend::TransactionLedger)
/// port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction identifier.
    pub tx_id: String,
    /// Settlement status (e.g. `"confirmed"`).
    pub status: String,
    /// When the transaction was recorded.
    pub timestamp: DateTime<Utc>,
    /// Human-readable amount including the unit (e.g. `"0.5 SOL"`).
    pub amount: String,
    /// Chain the transaction lives on.
    pub blockchain: String,
    /// Sender address.
    pub from_address: String,
    /// Recipient address.
    pub to_address: String,
}
