//! Wallet transaction ledger and the deposit/withdraw wizards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Cents;

pub mod deposit;
pub mod handlers;
pub mod withdraw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    PaymentSent,
    PaymentReceived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// One ledger entry. Immutable once created; the ledger is prepend-ordered
/// (newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount_cents: Cents,
    pub description: String,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount_cents: Cents,
        description: impl Into<String>,
        status: TransactionStatus,
        reference: Option<String>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            kind,
            amount_cents,
            description: description.into(),
            status,
            date: Utc::now(),
            reference,
        }
    }
}

/// The seeded ledger history.
pub fn seed_transactions() -> Vec<Transaction> {
    vec![
        Transaction::new(
            TransactionKind::PaymentReceived,
            50_000,
            "Gardening Job Reward",
            TransactionStatus::Completed,
            None,
        ),
        Transaction::new(
            TransactionKind::Withdrawal,
            20_000,
            "Withdrawal to FNB",
            TransactionStatus::Completed,
            None,
        ),
    ]
}
