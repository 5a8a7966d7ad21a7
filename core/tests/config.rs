//! Configuration loading from a key lookup.

use fraud_seeder_core::{
    config::{ProvisionerConfig, SeederConfig, StoreTarget, TtlSource, DEFAULT_TTL_DAYS},
    error::SeedError,
};
use std::collections::HashMap;
use std::path::PathBuf;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn generator_config_from_full_environment() {
    let cfg = SeederConfig::from_lookup(lookup(&[
        ("SUPABASE_URL", "https://abc.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
        ("ACCOUNTS_WHITELIST", "acct_1,acct_2"),
        ("SEED_DEBUG", "1"),
        ("SEED_RNG_SEED", "99"),
    ]))
    .unwrap();

    assert_eq!(
        cfg.store,
        StoreTarget::Rest {
            url: "https://abc.supabase.co".into(),
            service_key: "secret".into()
        }
    );
    assert_eq!(cfg.whitelist, vec!["acct_1", "acct_2"]);
    assert!(cfg.debug);
    assert_eq!(cfg.rng_seed, Some(99));
}

#[test]
fn missing_url_names_the_field() {
    let err =
        SeederConfig::from_lookup(lookup(&[("SUPABASE_SERVICE_ROLE_KEY", "secret")])).unwrap_err();
    assert!(matches!(err, SeedError::Configuration { field: "SUPABASE_URL" }), "got {err:?}");
}

#[test]
fn missing_key_names_the_field() {
    let err = SeederConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://abc.supabase.co")]))
        .unwrap_err();
    assert!(
        matches!(err, SeedError::Configuration { field: "SUPABASE_SERVICE_ROLE_KEY" }),
        "got {err:?}"
    );
}

#[test]
fn debug_flag_only_on_exact_one() {
    let base = [
        ("SUPABASE_URL", "https://abc.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
    ];
    for (value, expected) in [("1", true), ("0", false), ("true", false), ("", false)] {
        let mut pairs = base.to_vec();
        pairs.push(("SEED_DEBUG", value));
        let cfg = SeederConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.debug, expected, "SEED_DEBUG={value:?}");
    }
}

#[test]
fn sqlite_path_replaces_remote_credentials() {
    let cfg = SeederConfig::from_lookup(lookup(&[("SEED_SQLITE_PATH", "/tmp/local.db")])).unwrap();
    assert_eq!(cfg.store, StoreTarget::Sqlite { path: "/tmp/local.db".into() });
    assert!(cfg.whitelist.is_empty());
}

#[test]
fn bad_rng_seed_is_rejected() {
    let vars = [("SEED_SQLITE_PATH", "x.db"), ("SEED_RNG_SEED", "abc")];
    let err = SeederConfig::from_lookup(lookup(&vars)).unwrap_err();
    assert!(matches!(err, SeedError::InvalidConfiguration { field: "SEED_RNG_SEED", .. }));
}

#[test]
fn store_description_hides_the_credential() {
    let cfg = SeederConfig::from_lookup(lookup(&[
        ("SUPABASE_URL", "https://abcdefghijklmnopqrstuvwxyz.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "super-secret-key"),
    ]))
    .unwrap();
    let text = cfg.describe_store();
    assert!(!text.contains("super-secret-key"));
    assert!(text.contains("service_key_loaded=true"));
}

#[test]
fn ttl_defaults_to_thirty_days() {
    let cfg = ProvisionerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.ttl_days, DEFAULT_TTL_DAYS);
    assert_eq!(cfg.ttl_days, 30);
    assert_eq!(cfg.ttl_source, TtlSource::Default);
    assert_eq!(cfg.database_url, None);
    assert_eq!(cfg.project_root, PathBuf::from("."));
}

#[test]
fn ttl_from_environment() {
    let cfg = ProvisionerConfig::from_lookup(lookup(&[
        ("EVENT_BUFFER_TTL_DAYS", "7"),
        ("DATABASE_URL", "postgres://localhost/db"),
    ]))
    .unwrap();
    assert_eq!(cfg.ttl_days, 7);
    assert_eq!(cfg.ttl_source, TtlSource::Environment);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/db"));
}

#[test]
fn invalid_ttl_is_a_configuration_error() {
    for bad in ["zero", "0", "-5"] {
        let err =
            ProvisionerConfig::from_lookup(lookup(&[("EVENT_BUFFER_TTL_DAYS", bad)])).unwrap_err();
        assert!(
            matches!(err, SeedError::InvalidConfiguration { field: "EVENT_BUFFER_TTL_DAYS", .. }),
            "{bad}: got {err:?}"
        );
    }
}

#[test]
fn migration_path_is_fixed_under_project_root() {
    let cfg = ProvisionerConfig::from_lookup(lookup(&[("SEED_PROJECT_ROOT", "/srv/app")])).unwrap();
    assert_eq!(
        cfg.migration_path(),
        PathBuf::from("/srv/app/supabase/migrations/20250426_event_buffer.sql")
    );
}
