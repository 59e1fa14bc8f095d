// [libs/core/datasource/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Neither a tenant-specific handle nor a healthy static handle was
    /// available.
    #[error("no connection available for module {module}")]
    NoConnection { module: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(String),
}
