// [libs/infra/relational/src/errors.rs]
//! Error catalog for the relational adapter. Converges into
//! `ledgercore_domain::DomainError` at the repository boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelationalError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(#[from] libsql::Error),

    #[error("row mapping error: {0}")]
    Mapping(String),

    #[error("entity not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    #[error("duplicate key on {entity}: {detail}")]
    DuplicateKey { entity: String, detail: String },
}

impl From<RelationalError> for ledgercore_domain::DomainError {
    fn from(error: RelationalError) -> Self {
        use ledgercore_domain::DomainError;
        match error {
            RelationalError::NotFound { entity, id } => DomainError::EntityNotFound { entity, id },
            RelationalError::DuplicateKey { entity, detail } => {
                DomainError::DuplicateKey { entity, detail }
            }
            other => DomainError::Connection(other.to_string()),
        }
    }
}
