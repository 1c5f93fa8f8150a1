//! tally-core: domain types and derived-value arithmetic for the tally
//! personal finance tracker.

pub mod asset;
pub mod backup;
pub mod config;
pub mod derive;
pub mod ledger;
pub mod money;
pub mod month;
pub mod rollover;
pub mod transaction;

pub use asset::{Asset, AssetKind};
pub use backup::{BACKUP_VERSION, Backup, parse_backup};
pub use config::{FinancialConfig, IncomeStream};
pub use derive::{
    FinancialSummary, asset_growth, build_summary, derived_consumption, distribution_percent,
    total_assets_cny, variable_expense,
};
pub use ledger::Ledger;
pub use money::{Currency, parse_amount_or_zero, to_cny};
pub use month::MonthToken;
pub use rollover::check_rollover;
pub use transaction::{Transaction, TxnKind};

/// Identifier minting for transactions and assets.
pub mod ids {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Mint an opaque unique id: epoch millis plus a process-local counter.
    /// The counter keeps ids distinct when several records are created within
    /// the same millisecond.
    pub fn mint(prefix: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{millis}-{n}")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mint_is_unique() {
            let a = mint("t");
            let b = mint("t");
            assert_ne!(a, b);
            assert!(a.starts_with("t-"));
        }
    }
}
