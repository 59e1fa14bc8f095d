// [libs/domain/models/src/asset_rate.rs]
use chrono::{DateTime, Utc};
use ledgercore_decimal::ScaledDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exchange rate between two assets, scoped to an organization/ledger pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRate {
    pub id: Uuid,
    pub base_asset_code: String,
    pub counter_asset_code: String,
    pub amount: ScaledDecimal,
    pub scale: u32,
    pub source: String,
    pub organization_id: Uuid,
    pub ledger_id: Uuid,
    pub created_at: DateTime<Utc>,
}
