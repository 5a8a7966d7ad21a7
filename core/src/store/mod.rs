//! Store boundary.
//!
//! RULE: Only the store module knows how rows reach the database.
//! The generator talks to `AlertStore` and never builds SQL or HTTP itself.
//!
//! Two tables are touched: `connected_accounts` is read, `alerts` is written.
//! Nothing here updates or deletes rows.

mod rest;
mod sqlite;

pub use rest::RestStore;
pub use sqlite::{AlertRow, SqliteStore};

use crate::{
    error::SeedResult,
    scenario::{AlertType, Severity},
    types::{AccountId, AlertId},
};
use serde::{Deserialize, Serialize};

pub const ACCOUNTS_TABLE: &str = "connected_accounts";
pub const ALERTS_TABLE: &str = "alerts";
pub const STATUS_ACTIVE: &str = "active";

/// Filters for a `connected_accounts` read. Present filters are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountQuery {
    pub status: Option<String>,
    /// `Some(ids)` restricts to those ids; an empty list matches nothing.
    pub ids: Option<Vec<AccountId>>,
}

impl AccountQuery {
    /// Active accounts, further restricted to `whitelist` when it is non-empty.
    pub fn eligible(whitelist: &[String]) -> Self {
        Self {
            status: Some(STATUS_ACTIVE.to_string()),
            ids: (!whitelist.is_empty()).then(|| whitelist.to_vec()),
        }
    }

    /// The given ids regardless of status.
    pub fn by_ids(ids: &[String]) -> Self {
        Self {
            status: None,
            ids: Some(ids.to_vec()),
        }
    }

    /// Human-readable filter list for logs.
    pub fn describe(&self) -> String {
        let mut applied = Vec::new();
        if let Some(status) = &self.status {
            applied.push(format!("status='{status}'"));
        }
        if let Some(ids) = &self.ids {
            applied.push(format!("stripe_account_id IN {ids:?}"));
        }
        if applied.is_empty() {
            "none".to_string()
        } else {
            applied.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRow {
    pub stripe_account_id: AccountId,
    #[serde(default)]
    pub status: Option<String>,
}

/// Insert payload for `alerts`. `details` is deliberately absent: the
/// narrative stays on the chosen scenario and is not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAlert {
    pub stripe_account_id: AccountId,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub resolved: bool,
}

/// A row the store confirmed after insert. Fields other than `id` are
/// echoed back by the store and are optional because some stores only
/// return the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertedAlert {
    #[serde(default)]
    pub id: Option<AlertId>,
    #[serde(default)]
    pub stripe_account_id: Option<AccountId>,
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

/// The two operations a tick needs from a store.
pub trait AlertStore {
    /// Read `stripe_account_id` and `status` from `connected_accounts`.
    fn select_accounts(&self, query: &AccountQuery) -> SeedResult<Vec<AccountRow>>;

    /// Insert one alert. Returns whatever rows the store confirmed; an empty
    /// vec means the store acknowledged the call but handed nothing back.
    fn insert_alert(&self, alert: &NewAlert) -> SeedResult<Vec<InsertedAlert>>;
}
