// [tests/mirror/libs/infra/cache/scheduler_reference.test.rs]
//! Exercises `ReferenceCache::claim_due`/`unschedule`, the in-process model
//! of the SyncScheduler claim/unschedule atomic scripts, against claim-race
//! and lease-expiry scenarios.

use ledgercore_cache::reference::ReferenceCache;
use ledgercore_domain::{AccountType, Amount, Balance, BalanceOperation, OperationType};
use ledgercore_decimal::ScaledDecimal;
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;

fn seed_due_balances(cache: &mut ReferenceCache, count: usize, due_at: i64) -> Vec<String> {
    let mut keys = Vec::with_capacity(count);
    for i in 0..count {
        let balance = Balance {
            id: Uuid::new_v4(),
            alias: format!("alias{i}"),
            account_id: Uuid::new_v4(),
            asset_code: "USD".to_string(),
            available: ScaledDecimal::from_str("1000").unwrap(),
            on_hold: ScaledDecimal::zero(0),
            version: 0,
            account_type: AccountType::deposit(),
            allow_sending: true,
            allow_receiving: true,
            organization_id: Uuid::new_v4(),
            ledger_id: Uuid::new_v4(),
            secondary_key: format!("sec{i}"),
        };
        let key = format!("balance:{{transactions}}:org:ledger:sec{i}");
        let op = BalanceOperation {
            balance,
            amount: Amount::new("USD", OperationType::Debit, ScaledDecimal::from_str("1").unwrap()).unwrap(),
            physical_key: key.clone(),
            alias: format!("alias{i}"),
            is_pending: false,
        };
        cache.apply(true, due_at, &[op]).unwrap();
        keys.push(key);
    }
    keys
}

/// Two claim invocations against 40 due members with `maxClaims = 25` each
/// return disjoint sets whose union has size <= 40.
#[test]
fn certify_claim_race_returns_disjoint_sets() {
    let mut cache = ReferenceCache::new();
    seed_due_balances(&mut cache, 40, 1_000);

    let first = cache.claim_due(2_000, 25, 60);
    let second = cache.claim_due(2_000, 25, 60);

    let first_set: HashSet<_> = first.iter().cloned().collect();
    let second_set: HashSet<_> = second.iter().cloned().collect();
    assert!(first_set.is_disjoint(&second_set));

    let union: HashSet<_> = first_set.union(&second_set).cloned().collect();
    assert!(union.len() <= 40);
    // The first claim takes the full 25-member allowance (lease was free);
    // the retry only picks up the 15 members still unclaimed.
    assert_eq!(first.len(), 25);
    assert_eq!(second.len(), 15);
}

#[test]
fn certify_claim_respects_oldest_due_first_ordering() {
    let mut cache = ReferenceCache::new();
    let older = seed_due_balances(&mut cache, 1, 500);
    let newer = seed_due_balances(&mut cache, 1, 1_500);

    let claimed = cache.claim_due(2_000, 1, 60);
    assert_eq!(claimed, older);
    assert_ne!(claimed, newer);
}

#[test]
fn certify_not_yet_due_members_are_excluded() {
    let mut cache = ReferenceCache::new();
    seed_due_balances(&mut cache, 1, 5_000);

    let claimed = cache.claim_due(1_000, 10, 60);
    assert!(claimed.is_empty());
}

/// Scheduling the same balance twice yields one entry with the latest
/// score, not two.
#[test]
fn certify_rescheduling_updates_score_not_entry_count() {
    let mut cache = ReferenceCache::new();
    let keys = seed_due_balances(&mut cache, 1, 1_000);
    assert_eq!(cache.schedule_len(), 1);

    let balance = cache.get(&keys[0]).unwrap().clone();
    let op = BalanceOperation {
        balance: balance.clone(),
        amount: Amount::new("USD", OperationType::Credit, ScaledDecimal::from_str("1").unwrap()).unwrap(),
        physical_key: keys[0].clone(),
        alias: balance.alias.clone(),
        is_pending: false,
    };
    cache.apply(true, 9_000, &[op]).unwrap();

    assert_eq!(cache.schedule_len(), 1);
    assert_eq!(cache.schedule_score(&keys[0]), Some(9_000));
}

/// Lease mutual exclusion — a member claimed by one call is not claimable
/// again until its lease expires.
#[test]
fn certify_lease_mutual_exclusion_until_ttl_expiry() {
    let mut cache = ReferenceCache::new();
    let keys = seed_due_balances(&mut cache, 1, 1_000);

    let first = cache.claim_due(2_000, 10, 30);
    assert_eq!(first, keys);

    let immediate_retry = cache.claim_due(2_010, 10, 30);
    assert!(immediate_retry.is_empty());

    let after_expiry = cache.claim_due(2_050, 10, 30);
    assert_eq!(after_expiry, keys);
}

/// Unschedule is idempotent — safe even if either side effect already
/// happened.
#[test]
fn certify_unschedule_is_idempotent() {
    let mut cache = ReferenceCache::new();
    let keys = seed_due_balances(&mut cache, 1, 1_000);
    cache.claim_due(2_000, 10, 30);

    cache.unschedule(&keys[0]);
    assert_eq!(cache.schedule_len(), 0);

    // Calling again must not panic or error.
    cache.unschedule(&keys[0]);
    assert_eq!(cache.schedule_len(), 0);

    // Released lease lets another worker claim the already-unscheduled
    // member if it somehow got rescheduled, i.e. the lease itself is gone.
    assert!(cache.claim_due(2_000, 10, 30).is_empty());
}
