//! Device Names Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! HTTP front end for the device catalog.
//!
//! # Overview
//!
//! - **Lookup**: marketing name for a retail branding and model
//! - **Ingestion trigger**: runs one catalog ingestion and returns its summary
//! - **Health**: store connectivity check
//!
//! # Architecture
//!
//! Features follow a command/query split:
//!
//! - **Queries** (read): device lookup, served concurrently with ingestion
//! - **Commands** (write): ingestion trigger, at most one run at a time
//!
//! ## Framework Stack
//!
//! - **Axum**: routing and extractors
//! - **SQLx**: SQLite pool shared with the ingestion pipeline
//! - **Tower**: request tracing middleware
//!
//! # Example
//!
//! ```no_run
//! use devicenames_ingest::store;
//! use devicenames_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = store::connect(&config.database).await?;
//!     store::migrate(&pool).await?;
//!     let state = api::AppState::new(pool, &config)?;
//!     api::serve(&config, state, std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::AppError;
