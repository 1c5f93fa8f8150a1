//! End-to-end exercise of a month boundary: mutate the ledger, roll over,
//! read the derived figures, and round-trip a backup.

use chrono::{NaiveDate, Utc};
use tally_core::{
    Asset, AssetKind, Backup, Currency, IncomeStream, Ledger, MonthToken, Transaction, TxnKind,
    asset_growth, check_rollover, derived_consumption, parse_backup, total_assets_cny,
    variable_expense,
};

fn seeded_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.config.salary = IncomeStream::new(20000.0, Currency::Cny);
    ledger.config.rental = IncomeStream::new(0.0, Currency::Cny);
    ledger.config.social_security = 3000.0;
    ledger.config.loan = 5000.0;
    ledger.config.usd_cny_rate = 7.2;
    ledger.config.last_snapshot_month = MonthToken::new(2025, 5).unwrap();

    ledger.add_asset(Asset::new(
        "a-1",
        "招商银行",
        50000.0,
        Currency::Cny,
        AssetKind::Savings,
    ));
    ledger.add_asset(Asset::new(
        "a-2",
        "Chase",
        1200.0,
        Currency::Usd,
        AssetKind::Savings,
    ));
    ledger
}

#[test]
fn month_boundary_snapshot_then_growth() {
    let mut ledger = seeded_ledger();
    let june = MonthToken::new(2025, 6).unwrap();

    // First evaluation in June: snapshot fires with live balances.
    let assets = ledger.assets.clone();
    assert!(check_rollover(&mut ledger.config, &assets, june));
    assert_eq!(ledger.config.last_month_total_assets, 58640.0);

    // Balances grow mid-month.
    ledger.update_asset(Asset::new(
        "a-1",
        "招商银行",
        51360.0,
        Currency::Cny,
        AssetKind::Savings,
    ));
    assert!(!check_rollover(&mut ledger.config, &ledger.assets.clone(), june));

    assert_eq!(total_assets_cny(&ledger.assets, 7.2), 60000.0);
    assert_eq!(asset_growth(&ledger.assets, &ledger.config), 1360.0);
    assert_eq!(derived_consumption(&ledger.assets, &ledger.config), 10640.0);
}

#[test]
fn recorded_expenses_and_backup_roundtrip() {
    let mut ledger = seeded_ledger();
    let june = MonthToken::new(2025, 6).unwrap();

    ledger.add_transaction(Transaction::new(
        "t-1",
        "超市",
        350.0,
        Currency::Cny,
        "食品",
        NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
        TxnKind::Expense,
    ));
    ledger.add_transaction(Transaction::new(
        "t-2",
        "cloud bill",
        20.0,
        Currency::Usd,
        "subscriptions",
        NaiveDate::from_ymd_opt(2025, 6, 7).unwrap(),
        TxnKind::Expense,
    ));
    assert_eq!(
        variable_expense(&ledger.transactions, june, 7.2),
        350.0 + 144.0
    );

    let backup = Backup::from_ledger(&ledger, Utc::now());
    let json = serde_json::to_string(&backup).unwrap();
    let restored = parse_backup(&json).unwrap().into_ledger();
    assert_eq!(restored.transactions.len(), 2);
    assert_eq!(restored, ledger);

    // A truncated document must not parse.
    assert!(parse_backup(&json[..json.len() - 2]).is_err());
}
