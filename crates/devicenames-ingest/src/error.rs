//! Error types for device catalog ingestion
//!
//! Only failures that end a run live here. Row-level problems (malformed or
//! short rows, rejected inserts) are reported as
//! [`RowOutcome`](crate::models::RowOutcome) values in the run summary instead.

use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Failure that aborts an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch CSV: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to fetch CSV: {url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode CSV: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    #[error("Required header fields not found: {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Failed to read CSV record on line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("Failed to prepare statement: {0}")]
    Prepare(#[source] sqlx::Error),

    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("An ingestion run is already in progress")]
    AlreadyRunning,
}

/// Raw bytes that cannot be turned into CSV text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("source is empty")]
    Empty,

    #[error("source is not valid {encoding}")]
    Malformed { encoding: &'static str },

    #[error("license line is not terminated by a newline")]
    UnterminatedBanner,
}

/// Store setup and query errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}
