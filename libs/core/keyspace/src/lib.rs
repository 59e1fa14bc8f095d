// [libs/core/keyspace/src/lib.rs]
pub mod errors;
pub mod keys;
pub mod namespacer;

pub use errors::KeyspaceError;
pub use namespacer::{logical, physical, relabel_batch};
