// [libs/infra/relational/src/schema.rs]
//! DDL for the ledger's three relational tables. Column order matches the
//! positional INSERT contract exactly.

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, instrument};

const TABLES: &[(&str, &str)] = &[
    (
        "transaction",
        r#"
        CREATE TABLE IF NOT EXISTS "transaction" (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            description TEXT NOT NULL,
            template TEXT NOT NULL,
            status TEXT NOT NULL,
            status_description TEXT,
            amount TEXT NOT NULL,
            amount_scale INTEGER NOT NULL,
            asset_code TEXT NOT NULL,
            chart_of_accounts_group_name TEXT NOT NULL,
            ledger_id TEXT NOT NULL,
            organization_id TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            deleted_at DATETIME
        );
        "#,
    ),
    (
        "operation",
        r#"
        CREATE TABLE IF NOT EXISTS operation (
            id TEXT PRIMARY KEY,
            transaction_id TEXT NOT NULL,
            description TEXT NOT NULL,
            type TEXT NOT NULL,
            asset_code TEXT NOT NULL,
            amount TEXT NOT NULL,
            amount_scale INTEGER NOT NULL,
            available_balance TEXT NOT NULL,
            balance_scale INTEGER NOT NULL,
            on_hold_balance TEXT NOT NULL,
            available_balance_after TEXT NOT NULL,
            on_hold_balance_after TEXT NOT NULL,
            balance_scale_after INTEGER NOT NULL,
            status TEXT NOT NULL,
            status_description TEXT,
            account_id TEXT NOT NULL,
            account_alias TEXT NOT NULL,
            portfolio_id TEXT,
            chart_of_accounts TEXT NOT NULL,
            organization_id TEXT NOT NULL,
            ledger_id TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            deleted_at DATETIME
        );
        "#,
    ),
    (
        "asset_rate",
        r#"
        CREATE TABLE IF NOT EXISTS asset_rate (
            id TEXT PRIMARY KEY,
            base_asset_code TEXT NOT NULL,
            counter_asset_code TEXT NOT NULL,
            amount TEXT NOT NULL,
            scale INTEGER NOT NULL,
            source TEXT NOT NULL,
            organization_id TEXT NOT NULL,
            ledger_id TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    ),
];

const INDEXES: &[(&str, &str)] = &[
    (
        "idx_transaction_owners",
        "CREATE INDEX IF NOT EXISTS idx_transaction_owners ON \"transaction\"(organization_id, ledger_id, created_at DESC);",
    ),
    (
        "idx_operation_owners",
        "CREATE INDEX IF NOT EXISTS idx_operation_owners ON operation(organization_id, ledger_id, created_at DESC);",
    ),
    (
        "idx_operation_transaction",
        "CREATE INDEX IF NOT EXISTS idx_operation_transaction ON operation(transaction_id);",
    ),
    (
        "idx_asset_rate_owners",
        "CREATE INDEX IF NOT EXISTS idx_asset_rate_owners ON asset_rate(organization_id, ledger_id, base_asset_code, counter_asset_code);",
    ),
];

#[instrument(skip(connection))]
pub async fn apply_ledger_schema(connection: &Connection) -> Result<()> {
    for (name, sql) in TABLES {
        debug!(table = *name, "applying table ddl");
        connection
            .execute(sql, ())
            .await
            .with_context(|| format!("failed to create table {name}"))?;
    }
    for (name, sql) in INDEXES {
        debug!(index = *name, "applying index ddl");
        connection
            .execute(sql, ())
            .await
            .with_context(|| format!("failed to create index {name}"))?;
    }
    Ok(())
}
