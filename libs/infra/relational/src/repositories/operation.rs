// [libs/infra/relational/src/repositories/operation.rs]
use crate::client::RelationalClient;
use crate::errors::RelationalError;
use chrono::{DateTime, Utc};
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::{
    BalanceSnapshot, Operation, OperationType, TransactionStatus, TransactionStatusCode,
};
use libsql::{params, Row};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct OperationPatch {
    pub description: Option<String>,
    pub status: Option<TransactionStatus>,
}

pub struct OperationRepository {
    client: RelationalClient,
}

impl OperationRepository {
    pub fn new(client: RelationalClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, row), name = "relational.create_operation")]
    pub async fn create(&self, row: &Operation) -> Result<(), RelationalError> {
        let connection = self.client.get_connection()?;
        let affected = connection
            .execute(
                r#"INSERT INTO operation (
                    id, transaction_id, description, type, asset_code,
                    amount, amount_scale, available_balance, balance_scale,
                    on_hold_balance, available_balance_after, on_hold_balance_after,
                    balance_scale_after, status, status_description, account_id,
                    account_alias, portfolio_id, chart_of_accounts, organization_id,
                    ledger_id, created_at, updated_at, deleted_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                          ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)"#,
                params![
                    row.id.to_string(),
                    row.transaction_id.to_string(),
                    row.description.clone(),
                    operation_type_str(row.operation_type).to_string(),
                    row.asset_code.clone(),
                    row.amount.to_string(),
                    row.amount.scale() as i64,
                    row.balance_before.available.to_string(),
                    row.balance_before.available.scale() as i64,
                    row.balance_before.on_hold.to_string(),
                    row.balance_after.available.to_string(),
                    row.balance_after.on_hold.to_string(),
                    row.balance_after.available.scale() as i64,
                    status_code_str(row.status.code).to_string(),
                    row.status.description.clone(),
                    row.account_id.to_string(),
                    row.account_alias.clone(),
                    row.portfolio_id.map(|id| id.to_string()),
                    row.chart_of_accounts.clone(),
                    row.organization_id.to_string(),
                    row.ledger_id.to_string(),
                    row.created_at.to_rfc3339(),
                    row.updated_at.to_rfc3339(),
                    row.deleted_at.map(|ts| ts.to_rfc3339()),
                ],
            )
            .await?;
        if affected == 0 {
            return Err(RelationalError::NotFound {
                entity: "operation".to_string(),
                id: row.id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), name = "relational.find_all_operation")]
    pub async fn find_all(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        transaction_id: Option<Uuid>,
        limit: i64,
        page: i64,
    ) -> Result<Vec<Operation>, RelationalError> {
        let connection = self.client.get_connection()?;
        let offset = page.max(0) * limit.max(0);

        let mut rows = if let Some(transaction_id) = transaction_id {
            connection
                .query(
                    &select_operation_sql("transaction_id = ?3 AND deleted_at IS NULL ORDER BY created_at DESC LIMIT ?4 OFFSET ?5"),
                    params![
                        organization_id.to_string(),
                        ledger_id.to_string(),
                        transaction_id.to_string(),
                        limit,
                        offset
                    ],
                )
                .await?
        } else {
            connection
                .query(
                    &select_operation_sql("deleted_at IS NULL ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"),
                    params![organization_id.to_string(), ledger_id.to_string(), limit, offset],
                )
                .await?
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self, ids), name = "relational.list_by_ids_operation")]
    pub async fn list_by_ids(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Operation>, RelationalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let connection = self.client.get_connection()?;
        let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 3)).collect();
        let sql = select_operation_sql(&format!(
            "deleted_at IS NULL AND id IN ({})",
            placeholders.join(", ")
        ));
        let mut bound = vec![organization_id.to_string(), ledger_id.to_string()];
        bound.extend(ids.iter().map(|id| id.to_string()));
        let mut rows = connection.query(&sql, params_from(bound)).await?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map_row(&row)?);
        }
        Ok(out)
    }

    #[instrument(skip(self), name = "relational.find_operation")]
    pub async fn find(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
    ) -> Result<Operation, RelationalError> {
        let connection = self.client.get_connection()?;
        let mut rows = connection
            .query(
                &select_operation_sql("id = ?3 AND deleted_at IS NULL"),
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
                entity: "operation".to_string(),
                id: id.to_string(),
            }),
        }
    }

    #[instrument(skip(self, patch), name = "relational.update_operation")]
    pub async fn update(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
        patch: OperationPatch,
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
            r#"UPDATE operation SET {} WHERE organization_id = ?{organization_index}
               AND ledger_id = ?{ledger_index} AND id = ?{id_index} AND deleted_at IS NULL"#,
            set_fragments.join(", ")
        );

        let connection = self.client.get_connection()?;
        let affected = connection.execute(&sql, params_from(bound)).await?;
        if affected == 0 {
            return Err(RelationalError::NotFound {
                entity: "operation".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self), name = "relational.delete_operation")]
    pub async fn delete(
        &self,
        organization_id: Uuid,
        ledger_id: Uuid,
        id: Uuid,
    ) -> Result<(), RelationalError> {
        let connection = self.client.get_connection()?;
        connection
            .execute(
                r#"UPDATE operation SET deleted_at = ?4
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

fn select_operation_sql(tail: &str) -> String {
    format!(
        r#"SELECT id, transaction_id, description, type, asset_code,
            amount, amount_scale, available_balance, balance_scale,
            on_hold_balance, available_balance_after, on_hold_balance_after,
            balance_scale_after, status, status_description, account_id,
            account_alias, portfolio_id, chart_of_accounts, organization_id,
            ledger_id, created_at, updated_at, deleted_at
           FROM operation
           WHERE organization_id = ?1 AND ledger_id = ?2 AND {tail}"#
    )
}

fn operation_type_str(op: OperationType) -> &'static str {
    match op {
        OperationType::Debit => "DEBIT",
        OperationType::Credit => "CREDIT",
    }
}

fn operation_type_from_str(raw: &str) -> Result<OperationType, RelationalError> {
    match raw {
        "DEBIT" => Ok(OperationType::Debit),
        "CREDIT" => Ok(OperationType::Credit),
        other => Err(RelationalError::Mapping(format!(
            "unknown operation type {other}"
        ))),
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

fn map_row(row: &Row) -> Result<Operation, RelationalError> {
    let id: String = row.get(0)?;
    let transaction_id: String = row.get(1)?;
    let description: String = row.get(2)?;
    let operation_type: String = row.get(3)?;
    let asset_code: String = row.get(4)?;
    let amount: String = row.get(5)?;
    let available_balance: String = row.get(7)?;
    let on_hold_balance: String = row.get(9)?;
    let available_balance_after: String = row.get(10)?;
    let on_hold_balance_after: String = row.get(11)?;
    let status: String = row.get(13)?;
    let status_description: Option<String> = row.get(14)?;
    let account_id: String = row.get(15)?;
    let account_alias: String = row.get(16)?;
    let portfolio_id: Option<String> = row.get(17)?;
    let chart_of_accounts: String = row.get(18)?;
    let organization_id: String = row.get(19)?;
    let ledger_id: String = row.get(20)?;
    let created_at: String = row.get(21)?;
    let updated_at: String = row.get(22)?;
    let deleted_at: Option<String> = row.get(23)?;

    Ok(Operation {
        id: parse_uuid(id, "operation.id")?,
        transaction_id: parse_uuid(transaction_id, "operation.transaction_id")?,
        description,
        operation_type: operation_type_from_str(&operation_type)?,
        asset_code,
        amount: ScaledDecimal::from_str(&amount)
            .map_err(|e| RelationalError::Mapping(e.to_string()))?,
        balance_before: BalanceSnapshot {
            available: ScaledDecimal::from_str(&available_balance)
                .map_err(|e| RelationalError::Mapping(e.to_string()))?,
            on_hold: ScaledDecimal::from_str(&on_hold_balance)
                .map_err(|e| RelationalError::Mapping(e.to_string()))?,
        },
        balance_after: BalanceSnapshot {
            available: ScaledDecimal::from_str(&available_balance_after)
                .map_err(|e| RelationalError::Mapping(e.to_string()))?,
            on_hold: ScaledDecimal::from_str(&on_hold_balance_after)
                .map_err(|e| RelationalError::Mapping(e.to_string()))?,
        },
        status: TransactionStatus {
            code: status_code_from_str(&status)?,
            description: status_description,
        },
        account_id: parse_uuid(account_id, "operation.account_id")?,
        account_alias,
        portfolio_id: portfolio_id.map(|v| parse_uuid(v, "operation.portfolio_id")).transpose()?,
        chart_of_accounts,
        organization_id: parse_uuid(organization_id, "operation.organization_id")?,
        ledger_id: parse_uuid(ledger_id, "operation.ledger_id")?,
        created_at: parse_timestamp(created_at, "operation.created_at")?,
        updated_at: parse_timestamp(updated_at, "operation.updated_at")?,
        deleted_at: deleted_at
            .map(|v| parse_timestamp(v, "operation.deleted_at"))
            .transpose()?,
    })
}

fn params_from(values: Vec<String>) -> Vec<libsql::Value> {
    values.into_iter().map(libsql::Value::from).collect()
}
