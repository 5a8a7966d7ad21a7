//! seed-tick: inserts one synthetic fraud alert for a random active account.
//!
//! Zero arguments; everything comes from the environment:
//!   SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY   (required unless SEED_SQLITE_PATH)
//!   ACCOUNTS_WHITELIST                        (optional, comma separated)
//!   SEED_DEBUG=1                              (debug logging + whitelist pre-check)
//!   SEED_RNG_SEED                             (optional, reproducible tick)
//!   SEED_SQLITE_PATH                          (optional, local store)
//!
//! Exit status is 0 when an alert was inserted or nothing was eligible,
//! 1 on any configuration, connection, query or insert failure.

use anyhow::{Context, Result};
use fraud_seeder_core::{
    clock::SystemClock,
    config::{SeederConfig, ENV_SEED_DEBUG},
    generator::{run_configured_tick, TickReport},
    rng::SeedRng,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let debug = std::env::var(ENV_SEED_DEBUG).as_deref() == Ok("1");
    init_logging(debug);

    log::info!("[seed] Starting seeder tick...");
    match run() {
        Ok(report) => {
            log::info!("[seed] Seeder tick finished: {}", report.outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("[seed:error] {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<TickReport> {
    let config = SeederConfig::from_env().context("loading generator configuration")?;
    let mut rng = match config.rng_seed {
        Some(seed) => SeedRng::from_seed_u64(seed),
        None => SeedRng::from_entropy(),
    };
    let report = run_configured_tick(&config, &SystemClock, &mut rng)
        .context("running generator tick")?;
    Ok(report)
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
