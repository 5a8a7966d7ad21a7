//! The generator tick: one cold run from loaded config to insert-or-noop.
//!
//! STATES (strictly sequential, never resumed across invocations):
//!   Init -> ConfigLoaded -> Connected -> TargetsQueried
//!        -> NoEligibleTargets                       (terminal, success)
//!        -> TargetAndScenarioChosen -> Inserted      (terminal, success)
//!   any step that errors                 -> Failed  (terminal, failure)
//!
//! RULES:
//!   - At most one account read and one alert insert per tick.
//!   - No retries. The external scheduler owns retry policy.
//!   - Nothing is written before the single insert, so failure needs no rollback.

use crate::{
    clock::Clock,
    config::{SeederConfig, StoreTarget},
    error::SeedError,
    event::{Observations, SeedEvent},
    rng::SeedRng,
    scenario::{choose_scenario, ScenarioTemplate, FRAUD_SCENARIOS},
    selector::{pick_target, precheck_whitelist, select_eligible},
    store::{AlertStore, RestStore, SqliteStore},
    types::TickId,
    writer::{AlertWriter, ConfirmedAlert},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickState {
    Init,
    ConfigLoaded,
    Connected,
    TargetsQueried,
    NoEligibleTargets,
    TargetAndScenarioChosen,
    Inserted,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    NoEligibleTargets,
    Inserted(ConfirmedAlert),
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleTargets => f.write_str("no eligible targets, nothing inserted"),
            Self::Inserted(alert) => {
                let id = alert
                    .alert_id
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                write!(
                    f,
                    "alert inserted: acct={}, type={}, severity={}, id={}",
                    alert.stripe_account_id, alert.alert_type, alert.severity, id
                )
            }
        }
    }
}

#[derive(Debug)]
pub struct TickReport {
    pub tick_id: TickId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: TickOutcome,
    pub events: Vec<SeedEvent>,
}

/// A tick that ended in `Failed`. `state` is the last state reached before
/// the failing step.
#[derive(Debug, Error)]
#[error("tick {tick_id} failed after reaching {state:?}: {error}")]
pub struct TickFailure {
    pub tick_id: TickId,
    pub state: TickState,
    #[source]
    pub error: SeedError,
    pub events: Vec<SeedEvent>,
}

/// Tick correlation id, drawn from the tick's RNG so seeded runs replay it.
pub fn new_tick_id(rng: &mut SeedRng) -> TickId {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

pub struct Generator<'a, S: AlertStore + ?Sized> {
    store: &'a S,
    catalog: &'a [ScenarioTemplate],
}

impl<'a, S: AlertStore + ?Sized> Generator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            catalog: FRAUD_SCENARIOS,
        }
    }

    /// Replace the scenario catalog. Panics if `catalog` is empty.
    pub fn with_catalog(mut self, catalog: &'a [ScenarioTemplate]) -> Self {
        assert!(!catalog.is_empty(), "scenario catalog must not be empty");
        self.catalog = catalog;
        self
    }

    /// Run one tick against an already connected store.
    pub fn run_tick(
        &self,
        config: &SeederConfig,
        clock: &dyn Clock,
        rng: &mut SeedRng,
    ) -> Result<TickReport, TickFailure> {
        let tick_id = new_tick_id(rng);
        let started_at = clock.now();
        let mut obs = Observations::new();
        let mut state = TickState::Init;

        transition(&mut state, TickState::ConfigLoaded);
        transition(&mut state, TickState::Connected);
        obs.record(SeedEvent::TickStarted { tick_id, at: started_at });
        log::debug!("[seed:debug] Store: {}", config.describe_store());

        if config.debug && !config.whitelist.is_empty() {
            precheck_whitelist(self.store, &config.whitelist);
        }

        log::info!("[seed] Fetching active connected accounts...");
        let eligible = match select_eligible(self.store, &config.whitelist) {
            Ok(ids) => ids,
            Err(error) => return Err(fail(tick_id, state, error, obs)),
        };
        transition(&mut state, TickState::TargetsQueried);
        obs.record(SeedEvent::TargetsQueried {
            tick_id,
            eligible: eligible.len(),
            whitelist_applied: !config.whitelist.is_empty(),
        });

        let Some(target) = pick_target(&eligible, rng) else {
            transition(&mut state, TickState::NoEligibleTargets);
            obs.record(SeedEvent::NoEligibleTargets { tick_id });
            return Ok(TickReport {
                tick_id,
                started_at,
                finished_at: clock.now(),
                outcome: TickOutcome::NoEligibleTargets,
                events: obs.into_events(),
            });
        };
        log::info!("[seed] Found {} eligible accounts: {eligible:?}", eligible.len());

        let scenario = choose_scenario(self.catalog, rng);
        transition(&mut state, TickState::TargetAndScenarioChosen);
        obs.record(SeedEvent::TargetSelected {
            tick_id,
            stripe_account_id: target.clone(),
        });
        obs.record(SeedEvent::ScenarioChosen {
            tick_id,
            alert_type: scenario.alert_type,
            severity: scenario.severity,
        });

        let confirmed = match AlertWriter::new(self.store).write(target, &scenario) {
            Ok(confirmed) => confirmed,
            Err(error) => return Err(fail(tick_id, state, error, obs)),
        };
        transition(&mut state, TickState::Inserted);
        obs.record(SeedEvent::AlertInserted {
            tick_id,
            stripe_account_id: confirmed.stripe_account_id.clone(),
            alert_type: confirmed.alert_type,
            severity: confirmed.severity,
            alert_id: confirmed.alert_id.clone(),
        });

        Ok(TickReport {
            tick_id,
            started_at,
            finished_at: clock.now(),
            outcome: TickOutcome::Inserted(confirmed),
            events: obs.into_events(),
        })
    }
}

/// One tick with the built-in scenario catalog.
pub fn run_generator_tick<S: AlertStore + ?Sized>(
    config: &SeederConfig,
    clock: &dyn Clock,
    rng: &mut SeedRng,
    store: &S,
) -> Result<TickReport, TickFailure> {
    Generator::new(store).run_tick(config, clock, rng)
}

/// Connect to the store named by `config`, then run one tick.
/// The connection lives exactly as long as the tick.
pub fn run_configured_tick(
    config: &SeederConfig,
    clock: &dyn Clock,
    rng: &mut SeedRng,
) -> Result<TickReport, TickFailure> {
    match &config.store {
        StoreTarget::Rest { url, service_key } => {
            let store = RestStore::connect(url, service_key)
                .map_err(|error| connect_failure(rng, error))?;
            run_generator_tick(config, clock, rng, &store)
        }
        StoreTarget::Sqlite { path } => {
            let store = SqliteStore::open(path)
                .and_then(|s| s.migrate().map(|_| s))
                .map_err(|error| connect_failure(rng, SeedError::Connectivity(error.to_string())))?;
            run_generator_tick(config, clock, rng, &store)
        }
    }
}

fn connect_failure(rng: &mut SeedRng, error: SeedError) -> TickFailure {
    let tick_id = new_tick_id(rng);
    fail(tick_id, TickState::ConfigLoaded, error, Observations::new())
}

fn transition(state: &mut TickState, next: TickState) {
    log::debug!("[seed:debug] {state:?} -> {next:?}");
    *state = next;
}

fn fail(tick_id: TickId, state: TickState, error: SeedError, mut obs: Observations) -> TickFailure {
    log::debug!("[seed:debug] {state:?} -> {:?}", TickState::Failed);
    obs.record(SeedEvent::TickFailed {
        tick_id,
        state,
        error: error.to_string(),
    });
    TickFailure {
        tick_id,
        state,
        error,
        events: obs.into_events(),
    }
}
