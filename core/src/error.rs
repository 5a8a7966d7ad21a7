use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Configuration error: {field} is not set")]
    Configuration { field: &'static str },

    #[error("Configuration error: {field} has invalid value {value:?}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to initialize store client: {0}")]
    Connectivity(String),

    #[error("Failed to query {table}: {cause}")]
    Query { table: &'static str, cause: String },

    #[error("Failed to insert into {table}: {cause}")]
    Insert { table: &'static str, cause: String },

    #[error("Insert into {table} returned no data, potential failure")]
    InsertSilentFailure { table: &'static str },

    #[error("Migration file not found: {path}")]
    MigrationArtifactMissing { path: String },

    #[error("Migration via {mechanism} failed: {cause}")]
    MigrationApply { mechanism: String, cause: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;
