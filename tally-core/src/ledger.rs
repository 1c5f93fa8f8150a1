//! The ledger: owner of transactions, assets, and the financial config.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::config::FinancialConfig;
use crate::transaction::Transaction;

/// In-memory owner of the three entity collections.
///
/// Transactions are append/remove only and kept most-recent-first; that
/// ordering is part of the contract, not incidental. Assets are mutable in
/// place via full-record replace.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub assets: Vec<Asset>,
    pub config: FinancialConfig,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a transaction so the newest entry lists first.
    pub fn add_transaction(&mut self, txn: Transaction) {
        self.transactions.insert(0, txn);
    }

    /// Remove by id. Unknown ids are a no-op.
    pub fn delete_transaction(&mut self, id: &str) {
        self.transactions.retain(|t| t.id != id);
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// Replace the asset with the same id by the caller-provided full record.
    /// No-op when the id is unknown.
    pub fn update_asset(&mut self, asset: Asset) {
        if let Some(slot) = self.assets.iter_mut().find(|a| a.id == asset.id) {
            *slot = asset;
        }
    }

    pub fn delete_asset(&mut self, id: &str) {
        self.assets.retain(|a| a.id != id);
    }

    pub fn find_asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }
}
