//! Transaction records: one cash movement each, append-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Currency;

/// Whether a transaction moves money in or out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnKind {
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

/// One recorded cash movement.
///
/// The amount is an unsigned magnitude; the sign comes from `kind` at
/// aggregation time and is never stored negative. Records are immutable once
/// created, apart from deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Opaque unique identifier
    pub id: String,
    pub description: String,
    /// Non-negative magnitude
    pub amount: f64,
    pub currency: Currency,
    /// Free-text category ("餐饮", "rent", ...)
    pub category: String,
    pub date: NaiveDate,
    pub kind: TxnKind,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        currency: Currency,
        category: impl Into<String>,
        date: NaiveDate,
        kind: TxnKind,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount: amount.abs(),
            currency,
            category: category.into(),
            date,
            kind,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxnKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TxnKind::Income
    }

    /// Amount with the sign implied by the kind (expenses negative).
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TxnKind::Expense => -self.amount,
            TxnKind::Income => self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    #[test]
    fn test_amount_stored_as_magnitude() {
        let t = Transaction::new(
            "t-1",
            "groceries",
            -88.5,
            Currency::Cny,
            "food",
            date(),
            TxnKind::Expense,
        );
        assert_eq!(t.amount, 88.5);
        assert_eq!(t.signed_amount(), -88.5);
        assert!(t.is_expense());
    }

    #[test]
    fn test_income_sign() {
        let t = Transaction::new(
            "t-2",
            "salary",
            20000.0,
            Currency::Cny,
            "income",
            date(),
            TxnKind::Income,
        );
        assert_eq!(t.signed_amount(), 20000.0);
        assert!(t.is_income());
    }
}
