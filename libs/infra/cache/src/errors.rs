// [libs/infra/cache/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("command error: {0}")]
    Command(#[from] redis::RedisError),

    #[error("unexpected script result shape: {0}")]
    ScriptResultType(String),

    #[error("failed to deserialize script payload: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A typed business error returned by the BalanceEngine script:
    /// insufficient funds, send/receive denial, or an external-account
    /// on-hold violation, each carrying the offending alias.
    #[error("insufficient funds for balance alias {alias}")]
    InsufficientFunds { alias: String },

    #[error("on-hold reserve not permitted for external account alias {alias}")]
    OnHoldExternalAccount { alias: String },

    #[error("operation denied by send/receive policy for alias {alias}")]
    SendReceivingDenied { alias: String },
}

impl From<CacheError> for ledgercore_domain::DomainError {
    fn from(error: CacheError) -> Self {
        use ledgercore_domain::DomainError;
        match error {
            CacheError::InsufficientFunds { alias } => DomainError::InsufficientFunds { alias },
            CacheError::OnHoldExternalAccount { alias } => {
                DomainError::OnHoldExternalAccount { alias }
            }
            CacheError::SendReceivingDenied { alias } => {
                DomainError::SendReceivingDenied { alias }
            }
            CacheError::ScriptResultType(detail) => DomainError::ScriptResultType(detail),
            CacheError::Deserialize(detail) => DomainError::Deserialize(detail.to_string()),
            other => DomainError::Connection(other.to_string()),
        }
    }
}
