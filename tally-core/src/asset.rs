//! Bank/account balances. Current balance only, no history.

use serde::{Deserialize, Serialize};

use crate::money::Currency;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetKind {
    #[serde(rename = "savings")]
    Savings,
    #[serde(rename = "credit")]
    Credit,
}

/// One account balance. Balance may be negative for credit-type accounts.
/// Mutable in place via the ledger's replace-by-id update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: String,
    /// Account name ("招商银行", "Chase checking", ...)
    pub name: String,
    pub balance: f64,
    pub currency: Currency,
    pub kind: AssetKind,
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        balance: f64,
        currency: Currency,
        kind: AssetKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            currency,
            kind,
        }
    }
}
