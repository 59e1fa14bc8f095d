// [libs/core/keyspace/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyspaceError {
    #[error("physical key {physical:?} does not carry the expected tenant:{tenant}: prefix")]
    PrefixMismatch { tenant: String, physical: String },
}
