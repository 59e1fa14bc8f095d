// [libs/infra/relational/src/repositories/asset_rate.rs]
use crate::client::RelationalClient;
use crate::errors::RelationalError;
use chrono::{DateTime, Utc};
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::AssetRate;
use libsql::{params, Row};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

/// Completes the Transaction/Operation repository trio at parity: the data
/// model and schema both name `AssetRate` as a first-class table even
/// though its CRUD contract was never spelled out as explicitly as
/// Transaction/Operation's.
pub struct AssetRateRepository {
    client: RelationalClient,
}

impl AssetRateRepository {
    pub fn new(client: RelationalClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, row), name = "relational.create_asset_rate")]
    pub async fn create(&self, row: &AssetRate) -> Result<(), RelationalError> {
        let connection = self.client.get_connection()?;
        let affected = connection
            .execute(
                r#"INSERT INTO asset_rate (
                    id, base_asset_code, counter_asset_code, amount, scale,
                    source, organization_id, ledger_id, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                params![
                    row.id.to_string(),
                    row.base_asset_code.clone(),
                    row.counter_asset_code.clone(),
                    row.amount.to_string(),
                    row.scale as i64,
                    row.source.clone(),
                    row.organization_id.to_string(),
                    row.ledger_id.to_string(),
                    row.created_at.to_rfc3339(),
                ],
            )
            .await?;
        if affected == 0 {
            return Err(RelationalError::NotFound {
                entity: "asset_rate".to_string(),
                id: row.id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), name = "relational.find_asset_rate")]
    pub async fn find(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
    ) -> Result<AssetRate, RelationalError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                r#"SELECT id, base_asset_code, counter_asset_code, amount, scale,
                    source, organization_id, ledger_id, created_at
                   FROM asset_rate
                   WHERE organization_id = ?1 AND ledger_id = ?2 AND id = ?3"#,
                params![
                    organization_id.to_string(),
                    ledger_id.to_string(),
                    id.to_string()
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => map_row(&row),
            None => Err(RelationalError::NotFound {
                entity: "asset_rate".to_string(),
                id: id.to_string(),
            }),
        }
    }

    /// Most recent rate between a base/counter asset pair for a ledger.
    #[instrument(skip(self), name = "relational.find_latest_asset_rate")]
    pub async fn find_latest(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        base_asset_code: &str,
        counter_asset_code: &str,
    ) -> Result<AssetRate, RelationalError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                r#"SELECT id, base_asset_code, counter_asset_code, amount, scale,
                    source, organization_id, ledger_id, created_at
                   FROM asset_rate
                   WHERE organization_id = ?1 AND ledger_id = ?2
                     AND base_asset_code = ?3 AND counter_asset_code = ?4
                   ORDER BY created_at DESC LIMIT 1"#,
                params![
                    organization_id.to_string(),
                    ledger_id.to_string(),
                    base_asset_code.to_string(),
                    counter_asset_code.to_string(),
                ],
            )
            .await?;
        match rows.next().await? {
            Some(row) => map_row(&row),
            None => Err(RelationalError::NotFound {
                entity: "asset_rate".to_string(),
                id: format!("{base_asset_code}->{counter_asset_code}"),
            }),
        }
    }
}

fn parse_uuid(raw: String, field: &'static str) -> Result<Uuid, RelationalError> {
    Uuid::from_str(&raw).map_err(|e| RelationalError::Mapping(format!("{field}: {e}")))
}

fn parse_timestamp(raw: String, field: &'static str) -> Result<DateTime<Utc>, RelationalError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RelationalError::Mapping(format!("{field}: {e}")))
}

fn map_row(row: &Row) -> Result<AssetRate, RelationalError> {
    let id: String = row.get(0)?;
    let base_asset_code: String = row.get(1)?;
    let counter_asset_code: String = row.get(2)?;
    let amount: String = row.get(3)?;
    let scale: i64 = row.get(4)?;
    let source: String = row.get(5)?;
    let organization_id: String = row.get(6)?;
    let ledger_id: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(AssetRate {
        id: parse_uuid(id, "asset_rate.id")?,
        base_asset_code,
        counter_asset_code,
        amount: ScaledDecimal::from_str(&amount)
            .map_err(|e| RelationalError::Mapping(e.to_string()))?,
        scale: scale as u32,
        source,
        organization_id: parse_uuid(organization_id, "asset_rate.organization_id")?,
        ledger_id: parse_uuid(ledger_id, "asset_rate.ledger_id")?,
        created_at: parse_timestamp(created_at, "asset_rate.created_at")?,
    })
}
