//! CLI configuration: config.toml under the tally home.
//!
//! This is app plumbing (model choice, timeouts, timezone), distinct from the
//! financial config that lives in the ledger itself.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::store::ensure_tally_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmSection,
    /// IANA timezone the calendar month is evaluated in.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// Override the provider-default model (optional).
    pub model: Option<String>,
    /// Hard bound on each AI round trip.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSection {
                model: None,
                timeout_secs: tally_ai::DEFAULT_TIMEOUT_SECS,
            },
            timezone: "Asia/Shanghai".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<AppConfig> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(AppConfig::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = AppConfig::default();
    let s = toml::to_string_pretty(&cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Resolve the LLM config from the environment plus config.toml overrides.
/// `Ok(None)` means no API key is set and the AI commands should decline.
pub fn llm_config(app: &AppConfig) -> Result<Option<tally_ai::LlmConfig>> {
    let mut cfg = match tally_ai::config_from_env(app.timeout())? {
        Some(c) => c,
        None => return Ok(None),
    };
    if let Some(model) = &app.llm.model {
        cfg.model = model.clone();
    }
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let cfg = AppConfig::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&s).unwrap();
        assert_eq!(back.timezone, "Asia/Shanghai");
        assert_eq!(back.llm.timeout_secs, tally_ai::DEFAULT_TIMEOUT_SECS);
    }
}
