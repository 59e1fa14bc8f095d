// [tests/mirror/libs/usecase/coordinator.test.rs]
//! `TransactionCoordinator::process_transaction`'s `NOTED` short-circuit is
//! exercised against a real in-memory libSQL relational store, the same
//! pattern `tests/mirror/libs/infra/relational/*` uses. The approved path
//! requires a live BalanceEngine invocation over a running Redis instance,
//! which is not available in this harness (see `reference.rs`'s tests
//! instead) — this file covers what is reachable without one: the NOTED
//! bypass and the router's failure propagation.

use ledgercore_cache::CacheClient;
use ledgercore_datasource::{RequestContext, StaticRouter};
use ledgercore_decimal::ScaledDecimal;
use ledgercore_document::{DocumentClient, MetadataStore};
use ledgercore_domain::{
    AccountType, Amount, Balance, BalanceOperation, DomainError, OperationType, TransactionStatus,
    TransactionStatusCode,
};
use ledgercore_relational::RelationalClient;
use ledgercore_usecase::{CoordinatorConfig, ProcessTransactionInput, TransactionCoordinator};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

async fn relational_client(db_name: &str) -> RelationalClient {
    RelationalClient::connect(&format!("file:{db_name}?mode=memory&cache=shared"), None)
        .await
        .unwrap()
}

async fn metadata_store() -> MetadataStore {
    let client = DocumentClient::connect("mongodb://127.0.0.1:27017", "ledgercore_test")
        .await
        .unwrap();
    MetadataStore::new(client)
}

fn sample_balance(account_id: Uuid, organization_id: Uuid, ledger_id: Uuid) -> Balance {
    Balance {
        id: Uuid::new_v4(),
        alias: "source".to_string(),
        account_id,
        asset_code: "USD".to_string(),
        available: ScaledDecimal::from_str("1000").unwrap(),
        on_hold: ScaledDecimal::zero(0),
        version: 0,
        account_type: AccountType::deposit(),
        allow_sending: true,
        allow_receiving: true,
        organization_id,
        ledger_id,
        secondary_key: "sec-1".to_string(),
    }
}

fn noted_input(organization_id: Uuid, ledger_id: Uuid, transaction_id: Uuid) -> ProcessTransactionInput {
    let account_id = Uuid::new_v4();
    let balance = sample_balance(account_id, organization_id, ledger_id);
    let op = BalanceOperation {
        physical_key: format!("balance:{{transactions}}:{organization_id}:{ledger_id}:sec-1"),
        alias: balance.alias.clone(),
        amount: Amount::new("USD", OperationType::Debit, ScaledDecimal::from_str("100").unwrap()).unwrap(),
        balance,
        is_pending: false,
    };
    ProcessTransactionInput {
        organization_id,
        ledger_id,
        transaction_id,
        parent_id: None,
        status: TransactionStatus {
            code: TransactionStatusCode::Noted,
            description: Some("bookkeeping entry".to_string()),
        },
        description: "noted entry".to_string(),
        template: "default".to_string(),
        chart_of_accounts_group_name: "bookkeeping".to_string(),
        asset_code: "USD".to_string(),
        total_amount: ScaledDecimal::from_str("100").unwrap(),
        schedule_sync_enabled: true,
        operations: vec![op],
        operation_descriptions: HashMap::new(),
        operation_chart_of_accounts: HashMap::new(),
        operation_metadata: HashMap::new(),
    }
}

#[tokio::test]
async fn certify_noted_transaction_bypasses_the_balance_engine() {
    let relational = relational_client("usecase_noted_bypass").await;
    let metadata = metadata_store().await;
    let router: StaticRouter<RelationalClient, CacheClient> =
        StaticRouter::new(Some(relational), None);
    let coordinator = TransactionCoordinator::new(router, metadata, "");

    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction_id = Uuid::new_v4();
    let input = noted_input(organization_id, ledger_id, transaction_id);
    let expected_balance = input.operations[0].balance.clone();

    let ctx = RequestContext::new();
    let cancel = CancellationToken::new();
    let outcome = coordinator
        .process_transaction(&ctx, &cancel, input)
        .await
        .unwrap();

    assert_eq!(outcome.transaction.status.code, TransactionStatusCode::Noted);
    assert_eq!(outcome.operations.len(), 1);
    assert_eq!(outcome.balances.len(), 1);
    // No BalanceEngine invocation happened (no cache handle was ever
    // provided to the router), so the returned balance is exactly the
    // input balance, unchanged.
    assert_eq!(outcome.balances[0].available, expected_balance.available);
    assert_eq!(outcome.balances[0].version, expected_balance.version);
}

#[tokio::test]
async fn certify_approved_path_without_a_cache_handle_surfaces_connection_error() {
    let relational = relational_client("usecase_no_cache").await;
    let metadata = metadata_store().await;
    let router: StaticRouter<RelationalClient, CacheClient> =
        StaticRouter::new(Some(relational), None);
    let coordinator = TransactionCoordinator::new(router, metadata, "");

    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction_id = Uuid::new_v4();
    let mut input = noted_input(organization_id, ledger_id, transaction_id);
    input.status = TransactionStatus {
        code: TransactionStatusCode::Created,
        description: None,
    };

    let ctx = RequestContext::new();
    let cancel = CancellationToken::new();
    let result = coordinator.process_transaction(&ctx, &cancel, input).await;
    assert!(matches!(result, Err(DomainError::Connection(_))));
}

#[tokio::test]
async fn certify_cancellation_token_aborts_noted_processing() {
    let relational = relational_client("usecase_cancelled").await;
    let metadata = metadata_store().await;
    let router: StaticRouter<RelationalClient, CacheClient> =
        StaticRouter::new(Some(relational), None);
    let coordinator = TransactionCoordinator::new(router, metadata, "");

    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction_id = Uuid::new_v4();
    let input = noted_input(organization_id, ledger_id, transaction_id);

    let ctx = RequestContext::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = coordinator.process_transaction(&ctx, &cancel, input).await;
    assert!(matches!(result, Err(DomainError::Cancelled(_))));
}

#[tokio::test]
async fn certify_relational_timeout_surfaces_as_timeout_error() {
    let relational = relational_client("usecase_timeout").await;
    let metadata = metadata_store().await;
    let router: StaticRouter<RelationalClient, CacheClient> =
        StaticRouter::new(Some(relational), None);
    let coordinator = TransactionCoordinator::new(router, metadata, "").with_config(CoordinatorConfig {
        strict_alias_association: true,
        cache_timeout: Duration::from_millis(0),
        relational_timeout: Duration::from_nanos(1),
    });

    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction_id = Uuid::new_v4();
    let input = noted_input(organization_id, ledger_id, transaction_id);

    let ctx = RequestContext::new();
    let cancel = CancellationToken::new();
    let result = coordinator.process_transaction(&ctx, &cancel, input).await;
    assert!(matches!(result, Err(DomainError::Timeout(_))));
}
