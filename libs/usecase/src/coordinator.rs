// [libs/usecase/src/coordinator.rs]
//! The transaction-processing orchestrator: resolves accounts, invokes the
//! BalanceEngine, records operations, attaches metadata, and drives the
//! transaction's status transition. A linear `async fn` over injected
//! repositories rather than a stateful actor, since there is no shared
//! mutable state at this layer.

use crate::config::CoordinatorConfig;
use chrono::Utc;
use ledgercore_cache::{BalanceEngine, BalanceSnapshotResult, CacheClient};
use ledgercore_datasource::{DataSourceRouter, RequestContext};
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::{
    Balance, BalanceOperation, DomainError, Metadata, Operation, Transaction, TransactionStatus,
    TransactionStatusCode,
};
use ledgercore_keyspace::{keys, namespacer};
use ledgercore_document::MetadataStore;
use ledgercore_relational::{OperationRepository, RelationalClient, TransactionRepository};
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use uuid::Uuid;

/// Races `fut` against `dur` and against `cancel`. Every suspension point
/// this coordinator issues (cache, relational, document) is wrapped here so
/// that spec §5's "every request-scoped I/O carries a cancellation token"
/// and "high-latency cache responses MUST surface as errors" are both
/// honored uniformly, instead of per call site.
async fn with_deadline<F, T, E>(
    cancel: &CancellationToken,
    dur: Duration,
    label: &str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<DomainError>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(DomainError::Cancelled(label.to_string())),
        outcome = tokio::time::timeout(dur, fut) => match outcome {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(DomainError::Timeout(label.to_string())),
        },
    }
}

/// Everything `ProcessTransaction` needs for one commit: the
/// `(ctx, orgId, ledgerId, transactionId, status, pending, operations)`
/// contract, expanded into a named struct plus the row fields the
/// coordinator must persist.
pub struct ProcessTransactionInput {
    pub organization_id: Uuid,
    pub ledger_id: Uuid,
    pub transaction_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub status: TransactionStatus,
    pub description: String,
    pub template: String,
    pub chart_of_accounts_group_name: String,
    pub asset_code: String,
    pub total_amount: ScaledDecimal,
    /// The BalanceEngine script's leading `scheduleSyncEnabled` ARGV flag.
    pub schedule_sync_enabled: bool,
    pub operations: Vec<BalanceOperation>,
    /// Per-leg description and chart-of-accounts path, keyed by alias.
    pub operation_descriptions: HashMap<String, String>,
    pub operation_chart_of_accounts: HashMap<String, String>,
    /// Per-leg metadata to attach after the Operation row is created,
    /// keyed by alias.
    pub operation_metadata: HashMap<String, HashMap<String, serde_json::Value>>,
}

pub struct ProcessTransactionOutcome {
    pub transaction: Transaction,
    pub operations: Vec<Operation>,
    pub balances: Vec<Balance>,
}

pub struct TransactionCoordinator<R>
where
    R: DataSourceRouter<RelationalClient, CacheClient>,
{
    router: R,
    metadata: MetadataStore,
    engine: BalanceEngine,
    tenant: String,
    config: CoordinatorConfig,
}

impl<R> TransactionCoordinator<R>
where
    R: DataSourceRouter<RelationalClient, CacheClient>,
{
    pub fn new(router: R, metadata: MetadataStore, tenant: impl Into<String>) -> Self {
        Self {
            router,
            metadata,
            engine: BalanceEngine::new(),
            tenant: tenant.into(),
            config: CoordinatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    #[instrument(skip(self, ctx, cancel, input))]
    pub async fn process_transaction(
        &self,
        ctx: &RequestContext<RelationalClient, CacheClient>,
        cancel: &CancellationToken,
        input: ProcessTransactionInput,
    ) -> Result<ProcessTransactionOutcome, DomainError> {
        if input.status.code.bypasses_balance_engine() {
            return self.process_noted(ctx, cancel, input).await;
        }

        let cache = self.router.cache(ctx).map_err(|e| DomainError::Connection(e.to_string()))?;
        let mut connection = cache.connection();

        let outbox_key = namespacer::physical(&self.tenant, &keys::outbox_key());
        let transaction_key = namespacer::physical(
            &self.tenant,
            &keys::transaction_key(
                &input.organization_id.to_string(),
                &input.ledger_id.to_string(),
                &input.transaction_id.to_string(),
            ),
        );
        let schedule_key = namespacer::physical(&self.tenant, &keys::schedule_key());

        let results = with_deadline(
            cancel,
            self.config.cache_timeout,
            "balance_engine.apply",
            self.engine.apply(
                &mut connection,
                &outbox_key,
                &transaction_key,
                &schedule_key,
                input.schedule_sync_enabled,
                input.status.code,
                &input.operations,
            ),
        )
        .await?;

        let balances = self.reassociate(&input.operations, results)?;

        let relational = self
            .router
            .relational(ctx)
            .map_err(|e| DomainError::Connection(e.to_string()))?;
        let transaction_repository = TransactionRepository::new(relational.clone());
        let operation_repository = OperationRepository::new(relational);

        let now = Utc::now();
        let transaction = Transaction {
            id: input.transaction_id,
            parent_id: input.parent_id,
            description: input.description,
            template: input.template,
            status: TransactionStatus {
                code: TransactionStatusCode::Created,
                description: None,
            },
            amount: input.total_amount,
            asset_code: input.asset_code,
            chart_of_accounts_group_name: input.chart_of_accounts_group_name,
            organization_id: input.organization_id,
            ledger_id: input.ledger_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        with_deadline(
            cancel,
            self.config.relational_timeout,
            "relational.create_transaction",
            transaction_repository.create(&transaction),
        )
        .await?;

        let mut operations = Vec::with_capacity(input.operations.len());
        for (op, balance) in input.operations.iter().zip(balances.iter()) {
            let pre = op.balance.clone();
            let operation = Operation {
                id: Uuid::new_v4(),
                transaction_id: transaction.id,
                description: input
                    .operation_descriptions
                    .get(&op.alias)
                    .cloned()
                    .unwrap_or_default(),
                operation_type: op.amount.operation,
                asset_code: op.amount.asset_code.clone(),
                amount: op.amount.value.clone(),
                balance_before: (&pre).into(),
                balance_after: balance.into(),
                status: transaction.status.clone(),
                account_id: op.balance.account_id,
                account_alias: op.alias.clone(),
                portfolio_id: None,
                chart_of_accounts: input
                    .operation_chart_of_accounts
                    .get(&op.alias)
                    .cloned()
                    .unwrap_or_default(),
                organization_id: input.organization_id,
                ledger_id: input.ledger_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            with_deadline(
                cancel,
                self.config.relational_timeout,
                "relational.create_operation",
                operation_repository.create(&operation),
            )
            .await?;

            if let Some(fields) = input.operation_metadata.get(&op.alias) {
                let meta = Metadata {
                    entity_id: operation.id.to_string(),
                    entity_name: "operation".to_string(),
                    metadata: fields.clone(),
                    created_at: now,
                    updated_at: now,
                };
                meta.validate().map_err(DomainError::from)?;
                with_deadline(
                    cancel,
                    self.config.relational_timeout,
                    "document.create_metadata",
                    self.metadata.create("operation", &meta),
                )
                .await?;
            }

            operations.push(operation);
        }

        with_deadline(
            cancel,
            self.config.relational_timeout,
            "relational.update_transaction",
            transaction_repository.update(
                input.organization_id,
                input.ledger_id,
                transaction.id,
                ledgercore_relational::TransactionPatch {
                    description: None,
                    status: Some(TransactionStatus {
                        code: TransactionStatusCode::Approved,
                        description: None,
                    }),
                },
            ),
        )
        .await?;

        let mut approved_transaction = transaction;
        approved_transaction.status = TransactionStatus {
            code: TransactionStatusCode::Approved,
            description: None,
        };

        Ok(ProcessTransactionOutcome {
            transaction: approved_transaction,
            operations,
            balances,
        })
    }

    /// Spec §4.10 step 1: a `NOTED` transaction records the event but
    /// skips balance mutation entirely — the BalanceEngine is never
    /// invoked, so no outbox or schedule entry is written either.
    async fn process_noted(
        &self,
        ctx: &RequestContext<RelationalClient, CacheClient>,
        cancel: &CancellationToken,
        input: ProcessTransactionInput,
    ) -> Result<ProcessTransactionOutcome, DomainError> {
        let relational = self
            .router
            .relational(ctx)
            .map_err(|e| DomainError::Connection(e.to_string()))?;
        let transaction_repository = TransactionRepository::new(relational.clone());
        let operation_repository = OperationRepository::new(relational);

        let now = Utc::now();
        let transaction = Transaction {
            id: input.transaction_id,
            parent_id: input.parent_id,
            description: input.description,
            template: input.template,
            status: input.status.clone(),
            amount: input.total_amount,
            asset_code: input.asset_code,
            chart_of_accounts_group_name: input.chart_of_accounts_group_name,
            organization_id: input.organization_id,
            ledger_id: input.ledger_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        with_deadline(
            cancel,
            self.config.relational_timeout,
            "relational.create_transaction",
            transaction_repository.create(&transaction),
        )
        .await?;

        let mut operations = Vec::with_capacity(input.operations.len());
        let mut balances = Vec::with_capacity(input.operations.len());
        for op in &input.operations {
            let snapshot = (&op.balance).into();
            let operation = Operation {
                id: Uuid::new_v4(),
                transaction_id: transaction.id,
                description: input
                    .operation_descriptions
                    .get(&op.alias)
                    .cloned()
                    .unwrap_or_default(),
                operation_type: op.amount.operation,
                asset_code: op.amount.asset_code.clone(),
                amount: op.amount.value.clone(),
                balance_before: snapshot,
                balance_after: (&op.balance).into(),
                status: transaction.status.clone(),
                account_id: op.balance.account_id,
                account_alias: op.alias.clone(),
                portfolio_id: None,
                chart_of_accounts: input
                    .operation_chart_of_accounts
                    .get(&op.alias)
                    .cloned()
                    .unwrap_or_default(),
                organization_id: input.organization_id,
                ledger_id: input.ledger_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            with_deadline(
                cancel,
                self.config.relational_timeout,
                "relational.create_operation",
                operation_repository.create(&operation),
            )
            .await?;
            operations.push(operation);
            balances.push(op.balance.clone());
        }

        Ok(ProcessTransactionOutcome {
            transaction,
            operations,
            balances,
        })
    }

    /// Re-associates each BalanceEngine result with its input `Balance`
    /// by alias. A missing alias is handled per
    /// [`CoordinatorConfig::strict_alias_association`].
    fn reassociate(
        &self,
        operations: &[BalanceOperation],
        results: Vec<BalanceSnapshotResult>,
    ) -> Result<Vec<Balance>, DomainError> {
        let mut by_alias: HashMap<String, BalanceSnapshotResult> =
            results.into_iter().map(|r| (r.alias.clone(), r)).collect();

        let mut balances = Vec::with_capacity(operations.len());
        for op in operations {
            match by_alias.remove(&op.alias) {
                Some(snapshot) => balances.push(apply_snapshot(&op.balance, &snapshot)?),
                None if self.config.strict_alias_association => {
                    return Err(DomainError::ScriptResultType(format!(
                        "balance engine result missing alias {}",
                        op.alias
                    )));
                }
                None => {
                    tracing::warn!(alias = %op.alias, "balance engine result missing alias, skipping under lenient strictness");
                }
            }
        }
        Ok(balances)
    }
}

fn apply_snapshot(
    original: &Balance,
    snapshot: &BalanceSnapshotResult,
) -> Result<Balance, DomainError> {
    let mut updated = original.clone();
    updated.available =
        ScaledDecimal::from_str(&snapshot.available).map_err(|e| DomainError::Deserialize(e.to_string()))?;
    updated.on_hold =
        ScaledDecimal::from_str(&snapshot.on_hold).map_err(|e| DomainError::Deserialize(e.to_string()))?;
    updated.version = snapshot.version;
    Ok(updated)
}
