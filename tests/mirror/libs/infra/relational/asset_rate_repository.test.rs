// [tests/mirror/libs/infra/relational/asset_rate_repository.test.rs]
use chrono::Utc;
use ledgercore_decimal::ScaledDecimal;
use ledgercore_domain::AssetRate;
use ledgercore_relational::{AssetRateRepository, RelationalClient};
use std::str::FromStr;
use uuid::Uuid;

fn sample(organization_id: Uuid, ledger_id: Uuid, created_at: chrono::DateTime<Utc>) -> AssetRate {
    AssetRate {
        id: Uuid::new_v4(),
        base_asset_code: "USD".to_string(),
        counter_asset_code: "EUR".to_string(),
        amount: ScaledDecimal::from_str("0.92").unwrap(),
        scale: 2,
        source: "external-feed".to_string(),
        organization_id,
        ledger_id,
        created_at,
    }
}

async fn repository(db_name: &str) -> AssetRateRepository {
    let client = RelationalClient::connect(
        &format!("file:{db_name}?mode=memory&cache=shared"),
        None,
    )
    .await
    .unwrap();
    AssetRateRepository::new(client)
}

#[tokio::test]
async fn certify_create_then_find_round_trips() {
    let repository = repository("relational_rate_roundtrip").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();
    let rate = sample(organization_id, ledger_id, Utc::now());

    repository.create(&rate).await.unwrap();
    let found = repository
        .find(organization_id, ledger_id, rate.id)
        .await
        .unwrap();
    assert_eq!(found.amount, rate.amount);
    assert_eq!(found.base_asset_code, "USD");
}

#[tokio::test]
async fn certify_find_latest_picks_most_recent_rate() {
    let repository = repository("relational_rate_latest").await;
    let organization_id = Uuid::new_v4();
    let ledger_id = Uuid::new_v4();

    let older = sample(organization_id, ledger_id, Utc::now() - chrono::Duration::hours(1));
    let mut newer = sample(organization_id, ledger_id, Utc::now());
    newer.amount = ScaledDecimal::from_str("0.95").unwrap();

    repository.create(&older).await.unwrap();
    repository.create(&newer).await.unwrap();

    let latest = repository
        .find_latest(organization_id, ledger_id, "USD", "EUR")
        .await
        .unwrap();
    assert_eq!(latest.id, newer.id);
    assert_eq!(latest.amount, newer.amount);
}
