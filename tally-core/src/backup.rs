//! Backup documents: whole-state export and strict import.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::config::FinancialConfig;
use crate::ledger::Ledger;
use crate::transaction::Transaction;

pub const BACKUP_VERSION: u32 = 1;

/// The single JSON document written by export and consumed by import.
/// Every field is required; a document missing `transactions`, `assets`, or
/// `config` fails to parse and the import is rejected wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    pub transactions: Vec<Transaction>,
    pub assets: Vec<Asset>,
    pub config: FinancialConfig,
    #[serde(rename = "exportDate")]
    pub export_date: DateTime<Utc>,
    pub version: u32,
}

impl Backup {
    pub fn from_ledger(ledger: &Ledger, exported_at: DateTime<Utc>) -> Self {
        Self {
            transactions: ledger.transactions.clone(),
            assets: ledger.assets.clone(),
            config: ledger.config.clone(),
            export_date: exported_at,
            version: BACKUP_VERSION,
        }
    }

    /// Overwrite all three stores wholesale. Only call after a successful
    /// parse; the caller keeps its previous ledger on any failure path.
    pub fn into_ledger(self) -> Ledger {
        Ledger {
            transactions: self.transactions,
            assets: self.assets,
            config: self.config,
        }
    }
}

/// Parse and validate a backup document. Anything malformed (bad JSON, a
/// missing top-level key, an unknown version) is an error and must leave the
/// caller's state untouched.
pub fn parse_backup(json: &str) -> Result<Backup> {
    let backup: Backup = serde_json::from_str(json).context("not a valid backup document")?;
    if backup.version > BACKUP_VERSION {
        bail!(
            "backup version {} is newer than supported ({BACKUP_VERSION})",
            backup.version
        );
    }
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::money::Currency;
    use crate::transaction::TxnKind;
    use chrono::NaiveDate;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_transaction(Transaction::new(
            "t-1",
            "dinner",
            120.0,
            Currency::Cny,
            "food",
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            TxnKind::Expense,
        ));
        ledger.add_asset(Asset::new(
            "a-1",
            "bank",
            50000.0,
            Currency::Cny,
            AssetKind::Savings,
        ));
        ledger.config.usd_cny_rate = 7.1;
        ledger
    }

    #[test]
    fn test_export_import_roundtrip() {
        let ledger = sample_ledger();
        let backup = Backup::from_ledger(&ledger, Utc::now());
        let json = serde_json::to_string_pretty(&backup).unwrap();

        let restored = parse_backup(&json).unwrap().into_ledger();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_import_rejects_missing_config_key() {
        let json = r#"{
            "transactions": [],
            "assets": [],
            "exportDate": "2025-06-01T00:00:00Z",
            "version": 1
        }"#;
        assert!(parse_backup(json).is_err());
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(parse_backup("not json at all").is_err());
        assert!(parse_backup("{}").is_err());
    }

    #[test]
    fn test_import_rejects_newer_version() {
        let ledger = sample_ledger();
        let mut backup = Backup::from_ledger(&ledger, Utc::now());
        backup.version = 99;
        let json = serde_json::to_string(&backup).unwrap();
        assert!(parse_backup(&json).is_err());
    }
}
