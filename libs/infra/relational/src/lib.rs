pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::RelationalClient;
pub use errors::RelationalError;
pub use repositories::{
    AssetRateRepository, OperationPatch, OperationRepository, TransactionPatch,
    TransactionRepository,
};
