// [libs/infra/relational/src/repositories/transaction.rs]
use crate::client::RelationalClient;
use crate::errors::RelationalError;
use chrono::{DateTime, Utc};
use ledgercore_domain::{Transaction, TransactionStatus, TransactionStatusCode};
use libsql::{params, Row};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

/// Non-empty fields overwrite the stored row; `None` leaves a column
/// untouched.
#[derive(Debug, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
}

pub struct TransactionRepository {
    client: RelationalClient,
}

impl TransactionRepository {
    pub fn new(client: RelationalClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, row), name = "relational.create_transaction")]
    pub async fn create(&self, row: &Transaction) -> Result<(), RelationalError> {
        let connection = self.client.get_connection()?;
        let affected = connection
            .execute(
                r#"INSERT INTO "transaction" (
                    id, parent_id, description, template, status, status_description,
                    amount, amount_scale, asset_code, chart_of_accounts_group_name,
                    ledger_id, organization_id, created_at, updated_at, deleted_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#,
                params![
                    row.id.to_string(),
                    row.parent_id.map(|id| id.to_string()),
                    row.description.clone(),
                    row.template.clone(),
                    status_code_str(row.status.code).to_string(),
                    row.status.description.clone(),
                    row.amount.to_string(),
                    row.amount.scale() as i64,
                    row.asset_code.clone(),
                    row.chart_of_accounts_group_name.clone(),
                    row.ledger_id.to_string(),
                    row.organization_id.to_string(),
                    row.created_at.to_rfc3339(),
                    row.updated_at.to_rfc3339(),
                    row.deleted_at.map(|ts| ts.to_rfc3339()),
                ],
            )
            .await?;
        if affected == 0 {
            return Err(RelationalError::NotFound {
                entity: "transaction".to_string(),
                id: row.id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), name = "relational.find_all_transaction")]
    pub async fn find_all(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        limit: i64,
        page: i64,
    ) -> Result<Vec<Transaction>, RelationalError> {
        let connection = self.client.get_connection()?;
        let offset = page.max(0) * limit.max(0);
        let mut rows = connection
            .query(
                r#"SELECT id, parent_id, description, template, status, status_description,
                    amount, amount_scale, asset_code, chart_of_accounts_group_name,
                    ledger_id, organization_id, created_at, updated_at, deleted_at
                   FROM "transaction"
                   WHERE organization_id = ?1 AND ledger_id = ?2 AND deleted_at IS NULL
                   ORDER BY created_at DESC
                   LIMIT ?3 OFFSET ?4"#,
                params![
                    organization_id.to_string(),
                    ledger_id.to_string(),
                    limit,
                    offset
                ],
            )
            .await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, ids), name = "relational.list_by_ids_transaction")]
    pub async fn list_by_ids(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Transaction>, RelationalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let connection = self.client.get_connection()?;
        let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 3)).collect();
        let sql = format!(
            r#"SELECT id, parent_id, description, template, status, status_description,
                amount, amount_scale, asset_code, chart_of_accounts_group_name,
                ledger_id, organization_id, created_at, updated_at, deleted_at
               FROM "transaction"
               WHERE organization_id = ?1 AND ledger_id = ?2 AND deleted_at IS NULL
               AND id IN ({})"#,
            placeholders.join(", ")
        );
        let mut bound = vec![organization_id.to_string(), ledger_id.to_string()];
        bound.extend(ids.iter().map(|id| id.to_string()));
        let mut rows = connection.query(&sql, params_from(bound)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self), name = "relational.find_transaction")]
    pub async fn find(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
    ) -> Result<Transaction, RelationalError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                r#"SELECT id, parent_id, description, template, status, status_description,
                    amount, amount_scale, asset_code, chart_of_accounts_group_name,
                    ledger_id, organization_id, created_at, updated_at, deleted_at
                   FROM "transaction"
                   WHERE organization_id = ?1 AND ledger_id = ?2 AND id = ?3 AND deleted_at IS NULL"#,
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
                entity: "transaction".to_string(),
                id: id.to_string(),
            }),
        }
    }

    #[instrument(skip(self, patch), name = "relational.update_transaction")]
    pub async fn update(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
        patch: TransactionPatch,
    ) -> Result<(), RelationalError> {
        let mut set_fragments = Vec::new();
        let mut bound: Vec<String> = Vec::new();
        let mut next_index = 1;

        if let Some(description) = patch.description {
            set_fragments.push(format!("description = ?{next_index}"));
            bound.push(description);
            next_index += 1;
        }
        if let Some(status) = patch.status {
            set_fragments.push(format!("status = ?{next_index}"));
            bound.push(status_code_str(status.code).to_string());
            next_index += 1;
            set_fragments.push(format!("status_description = ?{next_index}"));
            bound.push(status.description.unwrap_or_default());
            next_index += 1;
        }
        if set_fragments.is_empty() {
            return Ok(());
        }
        set_fragments.push(format!("updated_at = ?{next_index}"));
        bound.push(Utc::now().to_rfc3339());
        next_index += 1;

        let organization_index = next_index;
        bound.push(organization_id.to_string());
        next_index += 1;
        let ledger_index = next_index;
        bound.push(ledger_id.to_string());
        next_index += 1;
        let id_index = next_index;
        bound.push(id.to_string());

        let sql = format!(
            r#"UPDATE "transaction" SET {} WHERE organization_id = ?{organization_index}
               AND ledger_id = ?{ledger_index} AND id = ?{id_index} AND deleted_at IS NULL"#,
            set_fragments.join(", ")
        );

        let connection = self.client.get_connection()?;
        let affected = connection.execute(&sql, params_from(bound)).await?;
        if affected == 0 {
            return Err(RelationalError::NotFound {
                entity: "transaction".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), name = "relational.delete_transaction")]
    pub async fn delete(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
    ) -> Result<(), RelationalError> {
        let connection = self.client.get_connection()?;
        connection
            .execute(
                r#"UPDATE "transaction" SET deleted_at = ?4
                   WHERE organization_id = ?1 AND ledger_id = ?2 AND id = ?3 AND deleted_at IS NULL"#,
                params![
                    organization_id.to_string(),
                    ledger_id.to_string(),
                    id.to_string(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }
}

fn status_code_str(code: TransactionStatusCode) -> &'static str {
    match code {
        TransactionStatusCode::Created => "CREATED",
        TransactionStatusCode::Approved => "APPROVED",
        TransactionStatusCode::Noted => "NOTED",
        TransactionStatusCode::Cancelled => "CANCELLED",
        TransactionStatusCode::Denied => "DENIED",
    }
}

fn status_code_from_str(raw: &str) -> Result<TransactionStatusCode, RelationalError> {
    match raw {
        "CREATED" => Ok(TransactionStatusCode::Created),
        "APPROVED" => Ok(TransactionStatusCode::Approved),
        "NOTED" => Ok(TransactionStatusCode::Noted),
        "CANCELLED" => Ok(TransactionStatusCode::Cancelled),
        "DENIED" => Ok(TransactionStatusCode::Denied),
        other => Err(RelationalError::Mapping(format!(
            "unknown transaction status {other}"
        ))),
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

fn map_row(row: &Row) -> Result<Transaction, RelationalError> {
    use ledgercore_decimal::ScaledDecimal;

    let id: String = row.get(0)?;
    let parent_id: Option<String> = row.get(1)?;
    let description: String = row.get(2)?;
    let template: String = row.get(3)?;
    let status: String = row.get(4)?;
    let status_description: Option<String> = row.get(5)?;
    let amount: String = row.get(6)?;
    let asset_code: String = row.get(8)?;
    let chart_of_accounts_group_name: String = row.get(9)?;
    let ledger_id: String = row.get(10)?;
    let organization_id: String = row.get(11)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    let deleted_at: Option<String> = row.get(14)?;

    Ok(Transaction {
        id: parse_uuid(id, "transaction.id")?,
        parent_id: parent_id.map(|v| parse_uuid(v, "transaction.parent_id")).transpose()?,
        description,
        template,
        status: TransactionStatus {
            code: status_code_from_str(&status)?,
            description: status_description,
        },
        amount: ScaledDecimal::from_str(&amount)
            .map_err(|e| RelationalError::Mapping(e.to_string()))?,
        asset_code,
        chart_of_accounts_group_name,
        organization_id: parse_uuid(organization_id, "transaction.organization_id")?,
        ledger_id: parse_uuid(ledger_id, "transaction.ledger_id")?,
        created_at: parse_timestamp(created_at, "transaction.created_at")?,
        updated_at: parse_timestamp(updated_at, "transaction.updated_at")?,
        deleted_at: deleted_at
            .map(|v| parse_timestamp(v, "transaction.deleted_at"))
            .transpose()?,
    })
}

fn params_from(values: Vec<String>) -> Vec<libsql::Value> {
    values.into_iter().map(libsql::Value::from).collect()
}
