//! Synthetic fraud-signal seeder.
//!
//! `generator` runs one tick: pick an eligible connected account, pick a
//! scenario from the fixed catalog, write one alert. `provisioner` applies the
//! event buffer migration and its expiry job.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod provisioner;
pub mod rng;
pub mod scenario;
pub mod selector;
pub mod store;
pub mod types;
pub mod writer;
