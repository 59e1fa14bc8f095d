// [libs/core/keyspace/src/namespacer.rs]
//! Pure tenant key namespacing. A logical key is the cache-agnostic name a
//! component reasons about; a physical key is what actually crosses into the
//! cache wire protocol. The mapping is the identity for an empty tenant and
//! a reversible prefix otherwise — it never touches the `{transactions}`
//! hash tag embedded in the logical root, so all keys for one tenant's one
//! ledger stay co-located on a single cluster shard.

use crate::errors::KeyspaceError;

const TENANT_PREFIX: &str = "tenant:";

/// Maps a logical key onto its physical, cache-wire form for `tenant`.
pub fn physical(tenant: &str, logical: &str) -> String {
    if tenant.is_empty() {
        return logical.to_string();
    }
    format!("{TENANT_PREFIX}{tenant}:{logical}")
}

/// Recovers the logical key from a physical key for `tenant`. Returns an
/// error if `physical_key` does not actually carry that tenant's prefix.
pub fn logical(tenant: &str, physical_key: &str) -> Result<String, KeyspaceError> {
    if tenant.is_empty() {
        return Ok(physical_key.to_string());
    }
    let prefix = format!("{TENANT_PREFIX}{tenant}:");
    physical_key
        .strip_prefix(&prefix)
        .map(str::to_string)
        .ok_or_else(|| KeyspaceError::PrefixMismatch {
            tenant: tenant.to_string(),
            physical: physical_key.to_string(),
        })
}

/// Re-keys a batch-read result map from physical keys back to the caller's
/// logical keys. Used at every boundary where a batch cache read would
/// otherwise leak tenant-prefixed keys to the caller.
pub fn relabel_batch<V>(
    tenant: &str,
    physical_results: impl IntoIterator<Item = (String, V)>,
) -> Result<Vec<(String, V)>, KeyspaceError> {
    physical_results
        .into_iter()
        .map(|(key, value)| logical(tenant, &key).map(|logical_key| (logical_key, value)))
        .collect()
}
