// [libs/infra/document/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(#[from] mongodb::error::Error),

    #[error("document mapping error: {0}")]
    Mapping(String),
}

impl From<DocumentError> for ledgercore_domain::DomainError {
    fn from(error: DocumentError) -> Self {
        use ledgercore_domain::DomainError;
        match error {
            DocumentError::Mapping(detail) => DomainError::Deserialize(detail),
            other => DomainError::Connection(other.to_string()),
        }
    }
}
