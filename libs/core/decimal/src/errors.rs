// [libs/core/decimal/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("invalid decimal literal: {0}")]
    InvalidFormat(String),
}
