// [libs/domain/models/src/balance.rs]
use crate::amount::Amount;
use ledgercore_decimal::ScaledDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open account-type classification. Modeled as a newtype rather than a
/// closed enum since the recognized kinds are configured per ledger, not
/// fixed by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountType(pub String);

impl AccountType {
    pub const DEPOSIT: &'static str = "deposit";
    pub const EXTERNAL: &'static str = "external";

    pub fn deposit() -> Self {
        Self(Self::DEPOSIT.to_string())
    }

    pub fn external() -> Self {
        Self(Self::EXTERNAL.to_string())
    }

    /// External accounts are exempt from the non-negative `available`
    /// invariant and forbidden from carrying an on-hold reserve.
    pub fn is_external(&self) -> bool {
        self.0 == Self::EXTERNAL
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub id: Uuid,
    pub alias: String,
    pub account_id: Uuid,
    pub asset_code: String,
    pub available: ScaledDecimal,
    pub on_hold: ScaledDecimal,
    pub version: u64,
    pub account_type: AccountType,
    pub allow_sending: bool,
    pub allow_receiving: bool,
    pub organization_id: Uuid,
    pub ledger_id: Uuid,
    pub secondary_key: String,
}

impl Balance {
    /// Non-external accounts never carry negative `available`, and
    /// `on_hold` is never negative for any account type.
    pub fn upholds_non_negative_invariant(&self) -> bool {
        let available_ok = self.account_type.is_external() || !self.available.is_negative();
        available_ok && !self.on_hold.is_negative()
    }
}

/// A snapshot of a balance's available/on-hold pair, used for operation
/// pre/post images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub available: ScaledDecimal,
    pub on_hold: ScaledDecimal,
}

impl From<&Balance> for BalanceSnapshot {
    fn from(balance: &Balance) -> Self {
        Self {
            available: balance.available.clone(),
            on_hold: balance.on_hold.clone(),
        }
    }
}

/// The BalanceEngine's input unit: a balance snapshot paired with the
/// requested amount, the resolved physical cache key, and the alias used to
/// re-associate the engine's output with this input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceOperation {
    pub balance: Balance,
    pub amount: Amount,
    pub physical_key: String,
    pub alias: String,
    pub is_pending: bool,
}
