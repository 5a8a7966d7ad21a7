//! Shared primitive types used across the seeder.

/// An opaque connected-account identifier (`stripe_account_id`).
pub type AccountId = String;

/// Correlation id stamped on every observation of a single tick.
pub type TickId = uuid::Uuid;

/// Store-assigned alert identifier. The remote store hands back a bigint,
/// but nothing here relies on that, so it is carried as JSON.
pub type AlertId = serde_json::Value;
