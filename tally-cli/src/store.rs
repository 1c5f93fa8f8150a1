//! On-disk persistence: three JSON files under the tally home directory,
//! written immediately after every mutation.
//!
//! Loading is forgiving: a missing or unparsable file yields the default
//! empty state for that store rather than an error, so corruption never
//! prevents startup. Writing is fire-and-forget in spirit; failures surface
//! with context but there is no rollback layer.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::{Asset, FinancialConfig, Ledger, Transaction};

pub fn tally_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Owner of the in-memory ledger plus its backing files. Every mutating
/// method persists the touched store before returning.
pub struct Store {
    dir: PathBuf,
    pub ledger: Ledger,
}

impl Store {
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let ledger = Ledger {
            transactions: load_or_default(&dir.join("transactions.json")),
            assets: load_or_default(&dir.join("assets.json")),
            config: load_or_default(&dir.join("config.json")),
        };
        Ok(Self { dir, ledger })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(ensure_tally_home()?)
    }

    fn save_transactions(&self) -> Result<()> {
        write_json(&self.dir.join("transactions.json"), &self.ledger.transactions)
    }

    fn save_assets(&self) -> Result<()> {
        write_json(&self.dir.join("assets.json"), &self.ledger.assets)
    }

    fn save_config(&self) -> Result<()> {
        write_json(&self.dir.join("config.json"), &self.ledger.config)
    }

    pub fn add_transaction(&mut self, txn: Transaction) -> Result<()> {
        self.ledger.add_transaction(txn);
        self.save_transactions()
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.ledger.delete_transaction(id);
        self.save_transactions()
    }

    pub fn add_asset(&mut self, asset: Asset) -> Result<()> {
        self.ledger.add_asset(asset);
        self.save_assets()
    }

    pub fn update_asset(&mut self, asset: Asset) -> Result<()> {
        self.ledger.update_asset(asset);
        self.save_assets()
    }

    pub fn delete_asset(&mut self, id: &str) -> Result<()> {
        self.ledger.delete_asset(id);
        self.save_assets()
    }

    /// Mutate the financial config through a closure, then persist it.
    pub fn update_config(&mut self, f: impl FnOnce(&mut FinancialConfig)) -> Result<()> {
        f(&mut self.ledger.config);
        self.save_config()
    }

    /// Replace all three stores at once (backup import).
    pub fn replace_all(&mut self, ledger: Ledger) -> Result<()> {
        self.ledger = ledger;
        self.save_transactions()?;
        self.save_assets()?;
        self.save_config()
    }
}
