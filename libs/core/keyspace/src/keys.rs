// [libs/core/keyspace/src/keys.rs]
//! Logical (tenant-agnostic) key builders for the cache wire protocol.
//! The `{transactions}` hash tag keeps everything belonging to one ledger's
//! balance-sync machinery on a single cluster shard; callers must pass these
//! through [`crate::namespacer::physical`] before issuing cache commands.

/// `balance:{transactions}:<org>:<ledger>:<secondaryKey>`
pub fn balance_key(organization_id: &str, ledger_id: &str, secondary_key: &str) -> String {
    format!("balance:{{transactions}}:{organization_id}:{ledger_id}:{secondary_key}")
}

/// `transaction:{transactions}:<org>:<ledger>:<txId>`
pub fn transaction_key(organization_id: &str, ledger_id: &str, transaction_id: &str) -> String {
    format!("transaction:{{transactions}}:{organization_id}:{ledger_id}:{transaction_id}")
}

/// `schedule:{transactions}:balance-sync`
pub fn schedule_key() -> String {
    "schedule:{transactions}:balance-sync".to_string()
}

/// `lock:{transactions}:balance-sync:` — prefix a claimed member onto this
/// to get the lease key for that balance.
pub fn lease_prefix() -> String {
    "lock:{transactions}:balance-sync:".to_string()
}

/// `backup_queue:{transactions}`
pub fn outbox_key() -> String {
    "backup_queue:{transactions}".to_string()
}
