//! The fixed monthly financial model and rollover state, a singleton record.

use serde::{Deserialize, Serialize};

use crate::money::Currency;
use crate::month::MonthToken;

/// A fixed monthly income stream with its own currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IncomeStream {
    pub amount: f64,
    pub currency: Currency,
}

impl IncomeStream {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

/// The fixed income/expense model plus conversion and rollover state.
///
/// `last_snapshot_month` only ever advances; the rollover engine is the sole
/// writer of the snapshot pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialConfig {
    pub salary: IncomeStream,
    pub rental: IncomeStream,
    /// Fixed monthly social-security deduction, CNY
    pub social_security: f64,
    /// Fixed monthly loan payment, CNY
    pub loan: f64,
    /// Total assets in CNY frozen at the last month boundary
    pub last_month_total_assets: f64,
    pub last_snapshot_month: MonthToken,
    /// USD→CNY multiplier
    pub usd_cny_rate: f64,
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            salary: IncomeStream::new(0.0, Currency::Cny),
            rental: IncomeStream::new(0.0, Currency::Cny),
            social_security: 0.0,
            loan: 0.0,
            last_month_total_assets: 0.0,
            last_snapshot_month: MonthToken {
                year: 1970,
                month: 1,
            },
            usd_cny_rate: 7.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_in_the_past() {
        let cfg = FinancialConfig::default();
        let now = MonthToken::new(2025, 1).unwrap();
        assert!(cfg.last_snapshot_month < now);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let mut cfg = FinancialConfig::default();
        cfg.salary = IncomeStream::new(20000.0, Currency::Cny);
        cfg.last_snapshot_month = MonthToken::new(2025, 6).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: FinancialConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
        assert!(json.contains("\"2025-06\""));
    }
}
