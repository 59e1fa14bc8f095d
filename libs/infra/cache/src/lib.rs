// [libs/infra/cache/src/lib.rs]
pub mod client;
pub mod errors;
pub mod outbox;
pub mod reference;
pub mod scripts;

pub use client::CacheClient;
pub use errors::CacheError;
pub use outbox::OutboxQueue;
pub use scripts::balance_engine::{BalanceEngine, BalanceSnapshotResult};
pub use scripts::scheduler::SyncScheduler;
