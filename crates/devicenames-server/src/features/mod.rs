//! Feature modules implementing the device names API
//!
//! Each feature is a vertical slice with its own commands, queries and routes.
//!
//! # Features
//!
//! - **devices**: marketing name lookup and catalog ingestion
//!
//! # Architecture
//!
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions

pub mod devices;

use axum::Router;
use devicenames_ingest::IngestPipeline;
use sqlx::SqlitePool;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// SQLite pool used for lookups
    pub db: SqlitePool,
    /// Ingestion pipeline; clones share its single-run guard
    pub pipeline: IngestPipeline,
}

/// Versioned API, mounted under `/api/v1`
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/devices", devices::devices_routes().with_state(state))
}

/// Unversioned root paths of the first API
pub fn legacy_router(state: FeatureState) -> Router<()> {
    devices::legacy_routes().with_state(state)
}
