//! Structured observations emitted during a tick.
//!
//! Every observation is logged as one JSON line and also kept on the tick's
//! report, so monitoring can grep the log and tests can assert on the list.

use crate::{
    generator::TickState,
    scenario::{AlertType, Severity},
    types::{AccountId, AlertId, TickId},
};
use chrono::{DateTime, Utc};
use log::Level;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedEvent {
    TickStarted {
        tick_id: TickId,
        at: DateTime<Utc>,
    },
    TargetsQueried {
        tick_id: TickId,
        eligible: usize,
        whitelist_applied: bool,
    },
    /// The eligible set was empty. This is a successful no-op, not a failure.
    NoEligibleTargets {
        tick_id: TickId,
    },
    TargetSelected {
        tick_id: TickId,
        stripe_account_id: AccountId,
    },
    ScenarioChosen {
        tick_id: TickId,
        alert_type: AlertType,
        severity: Severity,
    },
    AlertInserted {
        tick_id: TickId,
        stripe_account_id: AccountId,
        alert_type: AlertType,
        severity: Severity,
        alert_id: Option<AlertId>,
    },
    TickFailed {
        tick_id: TickId,
        state: TickState,
        error: String,
    },
}

impl SeedEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }       => "tick_started",
            Self::TargetsQueried { .. }    => "targets_queried",
            Self::NoEligibleTargets { .. } => "no_eligible_targets",
            Self::TargetSelected { .. }    => "target_selected",
            Self::ScenarioChosen { .. }    => "scenario_chosen",
            Self::AlertInserted { .. }     => "alert_inserted",
            Self::TickFailed { .. }        => "tick_failed",
        }
    }

    fn level(&self) -> Level {
        match self {
            Self::TickFailed { .. }        => Level::Error,
            Self::NoEligibleTargets { .. } => Level::Warn,
            _                              => Level::Info,
        }
    }
}

/// Ordered log of a single tick's observations.
#[derive(Debug, Default)]
pub struct Observations {
    events: Vec<SeedEvent>,
}

impl Observations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `event` and keep it.
    pub fn record(&mut self, event: SeedEvent) {
        let level = event.level();
        match serde_json::to_string(&event) {
            Ok(json) => log::log!(level, "[seed] {json}"),
            Err(e) => log::log!(level, "[seed] {} (unserializable: {e})", event.event_type()),
        }
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<SeedEvent> {
        self.events
    }
}
