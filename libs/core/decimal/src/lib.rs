// [libs/core/decimal/src/lib.rs]
pub mod errors;
pub mod scaled;

pub use errors::DecimalError;
pub use scaled::ScaledDecimal;
