// [tests/mirror/libs/infra/relational/operation_repository.test.rs]
use chrono::Utc;
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::{
    BalanceSnapshot, Operation, OperationType, TransactionStatus, TransactionStatusCode,
};
use ledgercore_relational::{OperationPatch, OperationRepository, RelationalClient};
use std::str::FromStr;
use uuid::Uuid;

fn sample(organization_id: Uuid, ledger_id: Uuid, transaction_id: Uuid) -> Operation {
    let now = Utc::now();
    Operation {
        id: Uuid::new_v4(),
        transaction_id,
        description: "debit leg".to_string(),
        operation_type: OperationType::Debit,
        asset_code: "USD".to_string(),
        amount: ScaledDecimal::from_str("100.00").unwrap(),
        balance_before: BalanceSnapshot {
            available: ScaledDecimal::from_str("1000.00").unwrap(),
            on_hold: ScaledDecimal::from_str("0.00").unwrap(),
        },
        balance_after: BalanceSnapshot {
            available: ScaledDecimal::from_str("900.00").unwrap(),
            on_hold: ScaledDecimal::from_str("0.00").unwrap(),
        },
        status: TransactionStatus {
            code: TransactionStatusCode::Approved,
            description: None,
        },
        account_id: Uuid::new_v4(),
        account_alias: "alias-1".to_string(),
        portfolio_id: None,
        chart_of_accounts: "assets:cash".to_string(),
        organization_id,
        ledger_id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

async fn repository(db_name: &str) -> OperationRepository {
    let client = RelationalClient::connect(
        &format!("file:{db_name}?mode=memory&cache=shared"),
        None,
    )
    .await
    .unwrap();
    OperationRepository::new(client)
}

#[tokio::test]
async fn certify_create_then_find_preserves_balance_snapshots() {
    let repository = repository("relational_op_roundtrip").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let operation = sample(organization_id, ledger_id, Uuid::new_v4());

    repository.create(&operation).await.unwrap();
    let found = repository
        .find(organization_id, ledger_id, operation.id)
        .await
        .unwrap();

    assert_eq!(found.balance_before.available, operation.balance_before.available);
    assert_eq!(found.balance_after.available, operation.balance_after.available);
    assert_eq!(found.operation_type, OperationType::Debit);
}

#[tokio::test]
async fn certify_find_all_filters_by_transaction_id() {
    let repository = repository("relational_op_find_all").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction_id = Uuid::new_v4();

    let matching = sample(organization_id, ledger_id, transaction_id);
    let other = sample(organization_id, ledger_id, Uuid::new_v4());
    repository.create(&matching).await.unwrap();
    repository.create(&other).await.unwrap();

    let page = repository
        .find_all(organization_id, ledger_id, Some(transaction_id), 10, 0)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, matching.id);
}

#[tokio::test]
async fn certify_update_changes_only_supplied_fields() {
    let repository = repository("relational_op_update").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let operation = sample(organization_id, ledger_id, Uuid::new_v4());
    repository.create(&operation).await.unwrap();

    repository
        .update(
            organization_id,
            ledger_id,
            operation.id,
            OperationPatch {
                description: Some("annotated leg".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();

    let found = repository
        .find(organization_id, ledger_id, operation.id)
        .await
        .unwrap();
    assert_eq!(found.description, "annotated leg");
    assert_eq!(found.status.code, TransactionStatusCode::Approved);
}

#[tokio::test]
async fn certify_delete_missing_row_reports_not_found_on_find() {
    let repository = repository("relational_op_delete").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let operation = sample(organization_id, ledger_id, Uuid::new_v4());
    repository.create(&operation).await.unwrap();

    repository
        .delete(organization_id, ledger_id, operation.id)
        .await
        .unwrap();
    assert!(repository
        .find(organization_id, ledger_id, operation.id)
        .await
        .is_err());
}
