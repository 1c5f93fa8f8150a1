//! Derived aggregates: pure functions over current ledger state, recomputed
//! on every read.

use serde::Serialize;

use crate::asset::Asset;
use crate::config::FinancialConfig;
use crate::ledger::Ledger;
use crate::money::to_cny;
use crate::month::MonthToken;
use crate::transaction::Transaction;

/// Sum of all asset balances converted to CNY. Order-independent.
pub fn total_assets_cny(assets: &[Asset], usd_cny_rate: f64) -> f64 {
    assets
        .iter()
        .map(|a| to_cny(a.balance, a.currency, usd_cny_rate))
        .sum()
}

/// Growth since the last monthly snapshot.
pub fn asset_growth(assets: &[Asset], config: &FinancialConfig) -> f64 {
    total_assets_cny(assets, config.usd_cny_rate) - config.last_month_total_assets
}

/// Recorded expenses dated in `month`, converted to CNY.
pub fn variable_expense(txns: &[Transaction], month: MonthToken, usd_cny_rate: f64) -> f64 {
    txns.iter()
        .filter(|t| t.is_expense() && MonthToken::from_date(t.date) == month)
        .map(|t| to_cny(t.amount, t.currency, usd_cny_rate))
        .sum()
}

/// The accounting residual: fixed net income minus asset growth.
///
/// Whatever fixed income did not show up as asset growth is treated as
/// discretionary spend. It is an identity, not a measurement, so it can go
/// negative or exceed the recorded expenses when data is incomplete.
pub fn derived_consumption(assets: &[Asset], config: &FinancialConfig) -> f64 {
    let salary_cny = to_cny(config.salary.amount, config.salary.currency, config.usd_cny_rate);
    let rental_cny = to_cny(config.rental.amount, config.rental.currency, config.usd_cny_rate);
    let fixed_net = salary_cny + rental_cny - config.social_security - config.loan;
    fixed_net - asset_growth(assets, config)
}

/// Share of total assets held by one asset, in percent. An empty list or a
/// zero total yields 0, never a division fault.
pub fn distribution_percent(asset: &Asset, assets: &[Asset], usd_cny_rate: f64) -> f64 {
    let total = total_assets_cny(assets, usd_cny_rate);
    if total == 0.0 {
        return 0.0;
    }
    to_cny(asset.balance, asset.currency, usd_cny_rate) / total * 100.0
}

/// The JSON-serializable bundle handed to the AI analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_assets_cny: f64,
    pub asset_growth_cny: f64,
    pub derived_consumption_cny: f64,
    pub variable_expense_cny: f64,
    pub usd_cny_rate: f64,
    pub assets: Vec<SummaryAsset>,
    pub fixed_monthly: FixedMonthly,
    pub recent_transactions: Vec<SummaryTxn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryAsset {
    pub name: String,
    pub balance: f64,
    pub currency: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixedMonthly {
    pub salary_cny: f64,
    pub rental_cny: f64,
    pub social_security_cny: f64,
    pub loan_cny: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryTxn {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub currency: &'static str,
    pub category: String,
    pub kind: &'static str,
}

/// Snapshot the ledger into the summary the analysis prompt embeds.
/// `recent` bounds how many transactions are included (newest first).
pub fn build_summary(ledger: &Ledger, month: MonthToken, recent: usize) -> FinancialSummary {
    let cfg = &ledger.config;
    let rate = cfg.usd_cny_rate;
    FinancialSummary {
        total_assets_cny: total_assets_cny(&ledger.assets, rate),
        asset_growth_cny: asset_growth(&ledger.assets, cfg),
        derived_consumption_cny: derived_consumption(&ledger.assets, cfg),
        variable_expense_cny: variable_expense(&ledger.transactions, month, rate),
        usd_cny_rate: rate,
        assets: ledger
            .assets
            .iter()
            .map(|a| SummaryAsset {
                name: a.name.clone(),
                balance: a.balance,
                currency: a.currency.code(),
            })
            .collect(),
        fixed_monthly: FixedMonthly {
            salary_cny: to_cny(cfg.salary.amount, cfg.salary.currency, rate),
            rental_cny: to_cny(cfg.rental.amount, cfg.rental.currency, rate),
            social_security_cny: cfg.social_security,
            loan_cny: cfg.loan,
        },
        recent_transactions: ledger
            .transactions
            .iter()
            .take(recent)
            .map(|t| SummaryTxn {
                date: t.date.to_string(),
                description: t.description.clone(),
                amount: t.amount,
                currency: t.currency.code(),
                category: t.category.clone(),
                kind: if t.is_expense() { "expense" } else { "income" },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::config::IncomeStream;
    use crate::money::Currency;
    use crate::transaction::TxnKind;
    use chrono::NaiveDate;

    fn sample_assets() -> Vec<Asset> {
        vec![
            Asset::new("a-1", "招商银行", 50000.0, Currency::Cny, AssetKind::Savings),
            Asset::new("a-2", "Chase", 1200.0, Currency::Usd, AssetKind::Savings),
        ]
    }

    #[test]
    fn test_total_assets_mixed_currencies() {
        // 50000 + 1200 * 7.2 = 58640
        assert_eq!(total_assets_cny(&sample_assets(), 7.2), 58640.0);
    }

    #[test]
    fn test_total_assets_invariant_under_reordering() {
        let mut assets = sample_assets();
        let forward = total_assets_cny(&assets, 7.2);
        assets.reverse();
        assert_eq!(total_assets_cny(&assets, 7.2), forward);
    }

    #[test]
    fn test_total_assets_empty_is_zero() {
        assert_eq!(total_assets_cny(&[], 7.2), 0.0);
    }

    #[test]
    fn test_distribution_percent_zero_guard() {
        let a = Asset::new("a-1", "x", 0.0, Currency::Cny, AssetKind::Savings);
        assert_eq!(distribution_percent(&a, &[], 7.2), 0.0);
        let zeros = vec![a.clone()];
        assert_eq!(distribution_percent(&a, &zeros, 7.2), 0.0);
    }

    #[test]
    fn test_derived_consumption_scenario() {
        // growth = 60000 - 58640 = 1360
        // consumption = (20000 + 0 - 3000 - 5000) - 1360 = 10640
        let assets = vec![Asset::new(
            "a-1",
            "bank",
            60000.0,
            Currency::Cny,
            AssetKind::Savings,
        )];
        let mut cfg = FinancialConfig::default();
        cfg.salary = IncomeStream::new(20000.0, Currency::Cny);
        cfg.rental = IncomeStream::new(0.0, Currency::Cny);
        cfg.social_security = 3000.0;
        cfg.loan = 5000.0;
        cfg.last_month_total_assets = 58640.0;
        cfg.usd_cny_rate = 7.2;

        assert_eq!(asset_growth(&assets, &cfg), 1360.0);
        assert_eq!(derived_consumption(&assets, &cfg), 10640.0);
    }

    #[test]
    fn test_variable_expense_filters_month_and_kind() {
        let june = MonthToken::new(2025, 6).unwrap();
        let txns = vec![
            Transaction::new(
                "t-1",
                "dinner",
                200.0,
                Currency::Cny,
                "food",
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                TxnKind::Expense,
            ),
            Transaction::new(
                "t-2",
                "book (usd)",
                10.0,
                Currency::Usd,
                "misc",
                NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
                TxnKind::Expense,
            ),
            // wrong month
            Transaction::new(
                "t-3",
                "rent",
                3000.0,
                Currency::Cny,
                "rent",
                NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                TxnKind::Expense,
            ),
            // income, not an expense
            Transaction::new(
                "t-4",
                "salary",
                20000.0,
                Currency::Cny,
                "income",
                NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                TxnKind::Income,
            ),
        ];
        assert_eq!(variable_expense(&txns, june, 7.2), 200.0 + 72.0);
    }

    #[test]
    fn test_coerced_amounts_keep_sums_finite() {
        let june = MonthToken::new(2025, 6).unwrap();
        let txns = vec![Transaction::new(
            "t-1",
            "typo'd amount",
            crate::money::parse_amount_or_zero("NaN"),
            Currency::Cny,
            "misc",
            NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            TxnKind::Expense,
        )];
        let total = variable_expense(&txns, june, 7.2);
        assert!(total.is_finite());
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_build_summary_bounds_recent() {
        let mut ledger = Ledger::new();
        for i in 0..30 {
            ledger.add_transaction(Transaction::new(
                format!("t-{i}"),
                "x",
                1.0,
                Currency::Cny,
                "misc",
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                TxnKind::Expense,
            ));
        }
        let s = build_summary(&ledger, MonthToken::new(2025, 6).unwrap(), 20);
        assert_eq!(s.recent_transactions.len(), 20);
        // newest first
        assert_eq!(s.recent_transactions[0].description, "x");
    }
}
