//! provision-retention: applies the event buffer migration and expiry job.
//!
//! Zero arguments. Reads EVENT_BUFFER_TTL_DAYS (default 30), DATABASE_URL
//! and SEED_PROJECT_ROOT (default "."). With the Supabase CLI, DATABASE_URL
//! may be omitted when `supabase status` reports a local database.
//! Exits 1 if the migration file is missing, no database URL can be found,
//! or applying the migration or storing the TTL fails.

use anyhow::{Context, Result};
use fraud_seeder_core::{
    config::ProvisionerConfig,
    provisioner::{run_provisioner, ProvisionReport},
};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(report) => {
            println!("{}", report.render());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ProvisionReport> {
    let config = ProvisionerConfig::from_env().context("loading provisioner configuration")?;
    log::info!(
        "Event buffer TTL: {} days ({:?})",
        config.ttl_days,
        config.ttl_source
    );
    let report = run_provisioner(&config).context("applying event_buffer migration")?;
    Ok(report)
}
