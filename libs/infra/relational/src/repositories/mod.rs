// [libs/infra/relational/src/repositories/mod.rs]
pub mod asset_rate;
pub mod operation;
pub mod transaction;

pub use asset_rate::AssetRateRepository;
pub use operation::{OperationPatch, OperationRepository};
pub use transaction::{TransactionPatch, TransactionRepository};
