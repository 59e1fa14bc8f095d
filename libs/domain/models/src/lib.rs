pub mod amount;
pub mod asset_rate;
pub mod balance;
pub mod errors;
pub mod metadata;
pub mod operation;
pub mod transaction;

pub use amount::{Amount, OperationType};
pub use asset_rate::AssetRate;
pub use balance::{AccountType, Balance, BalanceOperation, BalanceSnapshot};
pub use errors::DomainError;
pub use metadata::{Metadata, METADATA_FIELD_MAX_LEN};
pub use operation::Operation;
pub use transaction::{Transaction, TransactionStatus, TransactionStatusCode};
