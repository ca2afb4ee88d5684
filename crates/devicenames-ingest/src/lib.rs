//! Device Names Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Loads the Google Play supported-devices catalog into the `devices` table.
//!
//! # Pipeline
//!
//! - **Fetcher**: downloads the CSV over HTTP
//! - **Decoder**: sniffs the BOM, transcodes UTF-16LE and skips the license line
//! - **Parser**: reads the header, resolves the required columns, yields rows
//! - **Normalizer**: lowercases branding and model, keeps the marketing name
//! - **Sink**: inserts rows in one transaction, ignoring keys already stored
//!
//! # Example
//!
//! ```no_run
//! use devicenames_ingest::{store, IngestConfig, IngestPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = store::connect(&store::StoreConfig::from_env()?).await?;
//!     store::migrate(&pool).await?;
//!
//!     let pipeline = IngestPipeline::new(pool, &IngestConfig::from_env()?)?;
//!     let summary = pipeline.run().await?;
//!     println!("stored {} rows", summary.stored());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod sink;
pub mod store;

pub use config::{IngestConfig, SourceEncoding};
pub use error::{DecodeError, IngestError, StoreError};
pub use models::{DeviceRecord, IngestSummary, RowOutcome};
pub use pipeline::{ingest, IngestPipeline};
