//! Device Names Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities used by every workspace member.
//!
//! - **Logging**: `tracing` subscriber setup driven by `LOG_*` environment variables
//! - **Types**: the normalized lookup key shared by ingestion and queries
//!
//! # Example
//!
//! ```no_run
//! use devicenames_common::logging::{init_logging, LogConfig};
//! use devicenames_common::DeviceKey;
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     let key = DeviceKey::new("Samsung", "SM-G991B");
//!     assert_eq!(key.model(), "sm-g991b");
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod types;

pub use types::DeviceKey;
