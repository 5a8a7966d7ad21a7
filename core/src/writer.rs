//! Alert writer: builds the insert payload and verifies the store confirmed it.

use crate::{
    error::{SeedError, SeedResult},
    scenario::{AlertType, Scenario, Severity},
    store::{AlertStore, NewAlert, ALERTS_TABLE},
    types::{AccountId, AlertId},
};

/// An alert the store confirmed with at least one returned row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedAlert {
    pub stripe_account_id: AccountId,
    pub alert_type: AlertType,
    pub severity: Severity,
    /// `None` if the confirming row carried no `id`.
    pub alert_id: Option<AlertId>,
}

pub struct AlertWriter<'a, S: AlertStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: AlertStore + ?Sized> AlertWriter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The row written for `scenario`. `scenario.details` is not included:
    /// the alerts table has no agreed description column yet.
    pub fn payload(target: &str, scenario: &Scenario) -> NewAlert {
        NewAlert {
            stripe_account_id: target.to_string(),
            alert_type: scenario.alert_type,
            severity: scenario.severity,
            resolved: false,
        }
    }

    pub fn write(&self, target: &str, scenario: &Scenario) -> SeedResult<ConfirmedAlert> {
        let payload = Self::payload(target, scenario);
        log::info!("[seed] Inserting alert...");
        log::debug!(
            "[seed:debug] Inserting with data: {payload:?} (details not persisted: {:?})",
            scenario.details
        );

        let rows = self.store.insert_alert(&payload)?;
        let first = rows
            .into_iter()
            .next()
            .ok_or(SeedError::InsertSilentFailure { table: ALERTS_TABLE })?;

        Ok(ConfirmedAlert {
            stripe_account_id: payload.stripe_account_id,
            alert_type: payload.alert_type,
            severity: payload.severity,
            alert_id: first.id,
        })
    }
}
