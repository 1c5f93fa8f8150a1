//! Natural-language transaction entry and spending analysis.
//!
//! Both calls treat the remote model as an opaque, fallible collaborator.
//! `parse_entry` never errors: anything the model gets wrong collapses to a
//! fallback record the user can edit. `analyze` surfaces its error to the
//! caller, which renders it as a service-unavailable notice.

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use tally_core::{Currency, FinancialSummary, transaction::TxnKind};

use crate::llm::{LlmConfig, chat_complete};

/// The structured guess returned by `parse_entry`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEntry {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: TxnKind,
    pub currency: Currency,
}

impl ParsedEntry {
    /// The record used when the model is unreachable or its output is
    /// unusable: raw text as description, zero amount, expense, caller's
    /// currency.
    pub fn fallback(free_text: &str, default_currency: Currency) -> Self {
        Self {
            description: free_text.trim().to_string(),
            amount: 0.0,
            category: "uncategorized".to_string(),
            kind: TxnKind::Expense,
            currency: default_currency,
        }
    }
}

fn entry_system_prompt() -> String {
    "You extract bookkeeping records from natural language. \
     Respond with a single JSON object and nothing else, matching: \
     {\"description\": string, \"amount\": number, \"category\": string, \
     \"kind\": \"expense\"|\"income\", \"currency\": \"CNY\"|\"USD\"}. \
     No code fences, no commentary."
        .to_string()
}

fn entry_user_prompt(free_text: &str, default_currency: Currency) -> String {
    format!(
        "Text: {free_text}\nIf the text names no currency, use {}.",
        default_currency.code()
    )
}

/// What we accept from the wire before normalizing. Loose on purpose: the
/// remote model may omit or mistype fields and the soft contract tolerates it.
#[derive(Debug, Deserialize)]
struct WireEntry {
    description: Option<String>,
    amount: Option<f64>,
    category: Option<String>,
    kind: Option<String>,
    currency: Option<String>,
}

/// Remove markdown code-fence markers the model often wraps JSON in.
pub fn strip_code_fences(text: &str) -> String {
    // ```json ... ``` or plain ``` ... ```
    let re = Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap();
    match re.captures(text) {
        Some(c) => c[1].to_string(),
        None => text.trim().to_string(),
    }
}

fn normalize(wire: WireEntry, free_text: &str, default_currency: Currency) -> ParsedEntry {
    let description = wire
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| free_text.trim().to_string());
    let kind = match wire.kind.as_deref() {
        Some("income") => TxnKind::Income,
        _ => TxnKind::Expense,
    };
    let currency = wire
        .currency
        .map(|c| Currency::parse_or_cny(&c))
        .unwrap_or(default_currency);
    ParsedEntry {
        description,
        amount: wire.amount.unwrap_or(0.0).abs(),
        category: wire.category.unwrap_or_else(|| "uncategorized".to_string()),
        kind,
        currency,
    }
}

/// Best-effort structured extraction. Transport failures, timeouts, and
/// schema violations all yield the fallback record instead of an error.
pub async fn parse_entry(
    config: &LlmConfig,
    free_text: &str,
    default_currency: Currency,
) -> ParsedEntry {
    let system = entry_system_prompt();
    let user = entry_user_prompt(free_text, default_currency);

    let raw = match chat_complete(config, &system, &user).await {
        Ok(r) => r,
        Err(_) => return ParsedEntry::fallback(free_text, default_currency),
    };

    let cleaned = strip_code_fences(&raw);
    match serde_json::from_str::<WireEntry>(&cleaned) {
        Ok(wire) => normalize(wire, free_text, default_currency),
        Err(_) => ParsedEntry::fallback(free_text, default_currency),
    }
}

/// Free-form advisory text over the financial summary. Failures propagate.
pub async fn analyze(config: &LlmConfig, summary: &FinancialSummary) -> Result<String> {
    let system = "You are a pragmatic personal finance advisor. Given a JSON \
                  summary of assets, fixed monthly income and deductions, and \
                  recent transactions (amounts in CNY unless marked USD), give \
                  concise, concrete advice in markdown. Keep it under 300 words."
        .to_string();
    let user = serde_json::to_string_pretty(summary)?;
    chat_complete(config, &system, &user).await
}
