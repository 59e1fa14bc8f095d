pub mod config;
pub mod coordinator;

pub use config::CoordinatorConfig;
pub use coordinator::{
    ProcessTransactionInput, ProcessTransactionOutcome, TransactionCoordinator,
};
