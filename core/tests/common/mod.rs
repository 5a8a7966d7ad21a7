//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use fraud_seeder_core::{
    clock::FixedClock,
    config::{SeederConfig, StoreTarget},
    error::{SeedError, SeedResult},
    store::{
        AccountQuery, AccountRow, AlertStore, InsertedAlert, NewAlert, ACCOUNTS_TABLE,
        ALERTS_TABLE,
    },
};
use std::cell::{Cell, RefCell};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 4, 26, 12, 0, 0).unwrap())
}

pub fn config(whitelist: &[&str]) -> SeederConfig {
    SeederConfig {
        store: StoreTarget::Rest {
            url: "https://test.supabase.co".into(),
            service_key: "service-key".into(),
        },
        whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
        debug: false,
        rng_seed: None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Return the inserted row with a fresh id.
    Confirm,
    /// Report success but return no rows.
    Empty,
    /// Fail with a transport error.
    Fail,
}

/// Scripted in-memory store that records every call.
pub struct FakeStore {
    accounts: Vec<AccountRow>,
    fail_query: bool,
    insert_mode: InsertMode,
    next_id: Cell<i64>,
    pub queries: RefCell<Vec<AccountQuery>>,
    pub inserts: RefCell<Vec<NewAlert>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            fail_query: false,
            insert_mode: InsertMode::Confirm,
            next_id: Cell::new(1),
            queries: RefCell::new(Vec::new()),
            inserts: RefCell::new(Vec::new()),
        }
    }

    pub fn with_account(mut self, id: &str, status: &str) -> Self {
        self.accounts.push(AccountRow {
            stripe_account_id: id.to_string(),
            status: Some(status.to_string()),
        });
        self
    }

    pub fn with_active(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self = self.with_account(id, "active");
        }
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    pub fn insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.borrow().len()
    }
}

impl AlertStore for FakeStore {
    fn select_accounts(&self, query: &AccountQuery) -> SeedResult<Vec<AccountRow>> {
        self.queries.borrow_mut().push(query.clone());
        if self.fail_query {
            return Err(SeedError::Query {
                table: ACCOUNTS_TABLE,
                cause: "connection reset by peer".into(),
            });
        }
        Ok(self
            .accounts
            .iter()
            .filter(|a| match &query.status {
                Some(s) => a.status.as_deref() == Some(s.as_str()),
                None => true,
            })
            .filter(|a| match &query.ids {
                Some(ids) => ids.contains(&a.stripe_account_id),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn insert_alert(&self, alert: &NewAlert) -> SeedResult<Vec<InsertedAlert>> {
        self.inserts.borrow_mut().push(alert.clone());
        match self.insert_mode {
            InsertMode::Confirm => {
                let id = self.next_id.get();
                self.next_id.set(id + 1);
                Ok(vec![InsertedAlert {
                    id: Some(id.into()),
                    stripe_account_id: Some(alert.stripe_account_id.clone()),
                    alert_type: Some(alert.alert_type.as_str().to_string()),
                    severity: Some(alert.severity.as_str().to_string()),
                    resolved: Some(alert.resolved),
                }])
            }
            InsertMode::Empty => Ok(Vec::new()),
            InsertMode::Fail => Err(SeedError::Insert {
                table: ALERTS_TABLE,
                cause: "HTTP 503 Service Unavailable: upstream timeout".into(),
            }),
        }
    }
}
