// [libs/domain/models/src/transaction.rs]
use chrono::{DateTime, Utc};
use ledgercore_decimal::ScaledDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction lifecycle states: created as `CREATED`, moved to `APPROVED`
/// after a successful BalanceEngine run, optionally recorded as `NOTED`
/// (bookkeeping only, never touches balances), and may transition to a
/// terminal state via a later status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatusCode {
    Created,
    Approved,
    Noted,
    Cancelled,
    Denied,
}

impl TransactionStatusCode {
    /// Spec §4.4: "When transactionStatus = NOTED the script MUST NOT be
    /// invoked at all".
    pub fn bypasses_balance_engine(self) -> bool {
        matches!(self, Self::Noted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub code: TransactionStatusCode,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub description: String,
    pub template: String,
    pub status: TransactionStatus,
    pub amount: ScaledDecimal,
    pub asset_code: String,
    pub chart_of_accounts_group_name: String,
    pub organization_id: Uuid,
    pub ledger_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
