// [libs/domain/models/src/amount.rs]
use crate::errors::DomainError;
use ledgercore_decimal::ScaledDecimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Debit,
    Credit,
}

/// One leg's requested movement: an asset, a direction, and a non-negative
/// value. Sign is carried by `operation`, never by `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    pub asset_code: String,
    pub operation: OperationType,
    pub value: ScaledDecimal,
}

impl Amount {
    pub fn new(
        asset_code: impl Into<String>,
        operation: OperationType,
        value: ScaledDecimal,
    ) -> Result<Self, DomainError> {
        if value.is_negative() {
            return Err(DomainError::Deserialize(format!(
                "amount value must be non-negative, got {value}"
            )));
        }
        Ok(Self {
            asset_code: asset_code.into(),
            operation,
            value,
        })
    }
}
