//! The synthetic fraud scenario catalog and the chooser that draws from it.
//!
//! The catalog is an immutable process-wide table. Anything random about a
//! scenario (the bank_swap external account token) is produced when the
//! scenario is chosen and lives only on the returned `Scenario`; it is never
//! written back into the table.

use crate::rng::SeedRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes of randomness in a synthetic external bank account id.
pub const BANK_TOKEN_BYTES: usize = 12;
pub const BANK_TOKEN_PREFIX: &str = "ba_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Velocity,
    BankSwap,
    GeoMismatch,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Velocity    => "velocity",
            Self::BankSwap    => "bank_swap",
            Self::GeoMismatch => "geo_mismatch",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low    => "low",
            Self::Medium => "medium",
            Self::High   => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a template's narrative is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Details {
    Static(&'static str),
    /// `{prefix}{token}{suffix}` with a fresh `ba_<hex>` token per draw.
    WithBankToken {
        prefix: &'static str,
        suffix: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioTemplate {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub details: Details,
}

pub const FRAUD_SCENARIOS: &[ScenarioTemplate] = &[
    ScenarioTemplate {
        alert_type: AlertType::Velocity,
        severity: Severity::High,
        details: Details::Static("Synthetic: 3 payouts detected in under 30 seconds."),
    },
    ScenarioTemplate {
        alert_type: AlertType::BankSwap,
        severity: Severity::Medium,
        details: Details::WithBankToken {
            prefix: "Synthetic: New external account ",
            suffix: " added.",
        },
    },
    ScenarioTemplate {
        alert_type: AlertType::GeoMismatch,
        severity: Severity::Medium,
        details: Details::Static(
            "Synthetic: Charge attempted from IP 191.2.3.4, differs from US account geo.",
        ),
    },
];

/// A scenario as drawn for one tick, narrative fully rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub details: String,
}

impl ScenarioTemplate {
    /// Render this template. Token-bearing narratives draw from `rng` here.
    pub fn materialize(&self, rng: &mut SeedRng) -> Scenario {
        let details = match self.details {
            Details::Static(text) => text.to_string(),
            Details::WithBankToken { prefix, suffix } => {
                format!("{prefix}{}{suffix}", bank_account_token(rng))
            }
        };
        Scenario {
            alert_type: self.alert_type,
            severity: self.severity,
            details,
        }
    }
}

/// Uniform draw from `catalog`. Every entry has equal weight.
///
/// Panics if `catalog` is empty; the built-in catalog never is.
pub fn choose_scenario(catalog: &[ScenarioTemplate], rng: &mut SeedRng) -> Scenario {
    assert!(!catalog.is_empty(), "scenario catalog must not be empty");
    let template = &catalog[rng.index(catalog.len())];
    template.materialize(rng)
}

/// `ba_` followed by 12 random bytes as lowercase hex.
pub fn bank_account_token(rng: &mut SeedRng) -> String {
    let mut bytes = [0u8; BANK_TOKEN_BYTES];
    rng.fill_bytes(&mut bytes);
    let mut token = String::with_capacity(BANK_TOKEN_PREFIX.len() + BANK_TOKEN_BYTES * 2);
    token.push_str(BANK_TOKEN_PREFIX);
    for b in bytes {
        token.push_str(&format!("{b:02x}"));
    }
    token
}
