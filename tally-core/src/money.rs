//! Currency handling and the parse-or-default numeric policy.

use serde::{Deserialize, Serialize};

/// Currencies the ledger understands. CNY is the reference currency every
/// aggregate is normalized into; USD converts via the stored rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[serde(rename = "CNY")]
    #[default]
    Cny,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Cny => "CNY",
            Currency::Usd => "USD",
        }
    }

    /// Parse a currency code, case-insensitive. Unknown codes fall back to CNY.
    pub fn parse_or_cny(s: &str) -> Currency {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Currency::Usd,
            _ => Currency::Cny,
        }
    }
}

/// Convert an amount into CNY using the USD→CNY rate.
pub fn to_cny(amount: f64, currency: Currency, usd_cny_rate: f64) -> f64 {
    match currency {
        Currency::Cny => amount,
        Currency::Usd => amount * usd_cny_rate,
    }
}

/// Coerce user-entered numeric text to a number, defaulting to zero.
///
/// Amount fields accept free text; anything unparsable (including empty input)
/// becomes 0.0 rather than an error, so a bad keystroke never aborts a command.
/// "NaN" and "inf" parse as floats but are not amounts; they also become 0.0,
/// so a stored value can never turn the aggregates non-finite.
pub fn parse_amount_or_zero(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
