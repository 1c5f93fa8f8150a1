//! Year-month tokens used by the rollover snapshot.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month with day precision stripped, ordered chronologically.
/// Serializes as "YYYY-MM", the same token the config file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthToken {
    pub year: i32,
    pub month: u32,
}

impl MonthToken {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(anyhow!("invalid month: {month}"));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthToken {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("invalid month token: {s}"))?;
        let year: i32 = y.parse().map_err(|_| anyhow!("invalid year in: {s}"))?;
        let month: u32 = m.parse().map_err(|_| anyhow!("invalid month in: {s}"))?;
        MonthToken::new(year, month)
    }
}

impl TryFrom<String> for MonthToken {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MonthToken> for String {
    fn from(m: MonthToken) -> String {
        m.to_string()
    }
}
