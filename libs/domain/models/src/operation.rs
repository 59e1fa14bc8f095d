// [libs/domain/models/src/operation.rs]
use crate::amount::OperationType;
use crate::balance::BalanceSnapshot;
use crate::transaction::TransactionStatus;
use chrono::{DateTime, Utc};
use ledgercore_decimal::ScaledDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One leg of a Transaction. Immutable except for `description`, `status`,
/// and `deleted_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub description: String,
    pub operation_type: OperationType,
    pub asset_code: String,
    pub amount: ScaledDecimal,
    pub balance_before: BalanceSnapshot,
    pub balance_after: BalanceSnapshot,
    pub status: TransactionStatus,
    pub account_id: Uuid,
    pub account_alias: String,
    pub portfolio_id: Option<Uuid>,
    pub chart_of_accounts: String,
    pub organization_id: Uuid,
    pub ledger_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
