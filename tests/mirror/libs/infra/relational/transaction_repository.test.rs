// [tests/mirror/libs/infra/relational/transaction_repository.test.rs]
use chrono::Utc;
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::{Transaction, TransactionStatus, TransactionStatusCode};
use ledgercore_relational::{RelationalClient, TransactionPatch, TransactionRepository};
use std::str::FromStr;
use uuid::Uuid;

fn sample(organization_id: Uuid, ledger_id: Uuid) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: Uuid::new_v4(),
        parent_id: None,
        description: "payroll batch".to_string(),
        template: "default".to_string(),
        status: TransactionStatus {
            code: TransactionStatusCode::Created,
            description: None,
        },
        amount: ScaledDecimal::from_str("100.00").unwrap(),
        asset_code: "USD".to_string(),
        chart_of_accounts_group_name: "payroll".to_string(),
        organization_id,
        ledger_id,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

async fn repository(db_name: &str) -> TransactionRepository {
    let client = RelationalClient::connect(
        &format!("file:{db_name}?mode=memory&cache=shared"),
        None,
    )
    .await
    .unwrap();
    TransactionRepository::new(client)
}

#[tokio::test]
async fn certify_create_then_find_round_trips() {
    let repository = repository("relational_tx_roundtrip").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction = sample(organization_id, ledger_id);

    repository.create(&transaction).await.unwrap();
    let found = repository
        .find(organization_id, ledger_id, transaction.id)
        .await
        .unwrap();

    assert_eq!(found.id, transaction.id);
    assert_eq!(found.amount, transaction.amount);
    assert_eq!(found.status.code, TransactionStatusCode::Created);
}

#[tokio::test]
async fn certify_find_missing_row_is_not_found() {
    let repository = repository("relational_tx_missing").await;
    let result = repository
        .find(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn certify_update_transitions_status_to_approved() {
    let repository = repository("relational_tx_update").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction = sample(organization_id, ledger_id);
    repository.create(&transaction).await.unwrap();

    repository
        .update(
            organization_id,
            ledger_id,
            transaction.id,
            TransactionPatch {
                description: None,
                status: Some(TransactionStatus {
                    code: TransactionStatusCode::Approved,
                    description: None,
                }),
            },
        )
        .await
        .unwrap();

    let found = repository
        .find(organization_id, ledger_id, transaction.id)
        .await
        .unwrap();
    assert_eq!(found.status.code, TransactionStatusCode::Approved);
}

#[tokio::test]
async fn certify_delete_is_soft_and_idempotent() {
    let repository = repository("relational_tx_delete").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let transaction = sample(organization_id, ledger_id);
    repository.create(&transaction).await.unwrap();

    repository
        .delete(organization_id, ledger_id, transaction.id)
        .await
        .unwrap();
    assert!(repository
        .find(organization_id, ledger_id, transaction.id)
        .await
        .is_err());

    // Deleting again must not error (idempotent soft-delete).
    repository
        .delete(organization_id, ledger_id, transaction.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn certify_find_all_orders_by_created_at_descending() {
    let repository = repository("relational_tx_find_all").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();

    let mut first = sample(organization_id, ledger_id);
    first.created_at = Utc::now() - chrono::Duration::seconds(60);
    let mut second = sample(organization_id, ledger_id);
    second.created_at = Utc::now();

    repository.create(&first).await.unwrap();
    repository.create(&second).await.unwrap();

    let page = repository
        .find_all(organization_id, ledger_id, 10, 0)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, second.id);
    assert_eq!(page[1].id, first.id);
}

#[tokio::test]
async fn certify_list_by_ids_is_set_membership() {
    let repository = repository("relational_tx_list_by_ids").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();

    let wanted = sample(organization_id, ledger_id);
    let other = sample(organization_id, ledger_id);
    repository.create(&wanted).await.unwrap();
    repository.create(&other).await.unwrap();

    let found = repository
        .list_by_ids(organization_id, ledger_id, &[wanted.id])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, wanted.id);
}
