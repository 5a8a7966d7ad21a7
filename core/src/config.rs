//! Environment-sourced configuration for the two entry points.
//!
//! Both configs are built exactly once at startup. `from_env()` reads the
//! process environment; `from_lookup()` takes any key lookup so tests never
//! have to mutate the real environment.

use crate::error::{SeedError, SeedResult};
use std::path::PathBuf;

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ENV_ACCOUNTS_WHITELIST: &str = "ACCOUNTS_WHITELIST";
pub const ENV_SEED_DEBUG: &str = "SEED_DEBUG";
pub const ENV_SEED_RNG_SEED: &str = "SEED_RNG_SEED";
pub const ENV_SEED_SQLITE_PATH: &str = "SEED_SQLITE_PATH";

pub const ENV_TTL_DAYS: &str = "EVENT_BUFFER_TTL_DAYS";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PROJECT_ROOT: &str = "SEED_PROJECT_ROOT";

pub const DEFAULT_TTL_DAYS: u32 = 30;

/// Fixed location of the event buffer migration, relative to the project root.
pub const MIGRATION_RELATIVE_PATH: &str = "supabase/migrations/20250426_event_buffer.sql";

// ── Generator ────────────────────────────────────────────────────────────────

/// Where the tick reads accounts from and writes alerts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Remote PostgREST endpoint authenticated with the service-role key.
    Rest { url: String, service_key: String },
    /// Local SQLite database, for development runs.
    Sqlite { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederConfig {
    pub store: StoreTarget,
    /// Literal comma split of `ACCOUNTS_WHITELIST`. Empty means no restriction.
    /// Entries are NOT trimmed: `"a, b"` yields `["a", " b"]`.
    pub whitelist: Vec<String>,
    pub debug: bool,
    pub rng_seed: Option<u64>,
}

impl SeederConfig {
    pub fn from_env() -> SeedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SeedResult<Self> {
        let debug = lookup(ENV_SEED_DEBUG).as_deref() == Some("1");
        let whitelist = parse_whitelist(lookup(ENV_ACCOUNTS_WHITELIST).as_deref());

        let rng_seed = match lookup(ENV_SEED_RNG_SEED) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                SeedError::InvalidConfiguration {
                    field: ENV_SEED_RNG_SEED,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let store = match lookup(ENV_SEED_SQLITE_PATH).filter(|p| !p.is_empty()) {
            Some(path) => StoreTarget::Sqlite { path },
            None => {
                let url = required(&lookup, ENV_SUPABASE_URL)?;
                let service_key = required(&lookup, ENV_SERVICE_ROLE_KEY)?;
                StoreTarget::Rest { url, service_key }
            }
        };

        Ok(Self {
            store,
            whitelist,
            debug,
            rng_seed,
        })
    }

    /// One-line description safe to log: never contains the credential.
    pub fn describe_store(&self) -> String {
        match &self.store {
            StoreTarget::Rest { url, service_key } => {
                let prefix: String = url.chars().take(20).collect();
                format!(
                    "rest url={prefix}... service_key_loaded={}",
                    !service_key.is_empty()
                )
            }
            StoreTarget::Sqlite { path } => format!("sqlite path={path}"),
        }
    }
}

/// Split on commas, nothing else. Unset or empty input means no whitelist.
pub fn parse_whitelist(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, field: &'static str) -> SeedResult<String> {
    lookup(field)
        .filter(|v| !v.is_empty())
        .ok_or(SeedError::Configuration { field })
}

// ── Provisioner ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlSource {
    Environment,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    pub ttl_days: u32,
    pub ttl_source: TtlSource,
    /// Only consulted when the declarative mechanism is unavailable.
    pub database_url: Option<String>,
    pub project_root: PathBuf,
}

impl ProvisionerConfig {
    pub fn from_env() -> SeedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SeedResult<Self> {
        let (ttl_days, ttl_source) = match lookup(ENV_TTL_DAYS).filter(|v| !v.trim().is_empty()) {
            Some(raw) => {
                let days = raw.trim().parse::<u32>().map_err(|e| {
                    SeedError::InvalidConfiguration {
                        field: ENV_TTL_DAYS,
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if days == 0 {
                    return Err(SeedError::InvalidConfiguration {
                        field: ENV_TTL_DAYS,
                        value: raw,
                        reason: "TTL must be at least one day".into(),
                    });
                }
                (days, TtlSource::Environment)
            }
            None => (DEFAULT_TTL_DAYS, TtlSource::Default),
        };

        let project_root = lookup(ENV_PROJECT_ROOT)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            ttl_days,
            ttl_source,
            database_url: lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()),
            project_root,
        })
    }

    pub fn migration_path(&self) -> PathBuf {
        self.project_root.join(MIGRATION_RELATIVE_PATH)
    }
}
