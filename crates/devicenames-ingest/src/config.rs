//! Ingestion configuration
//!
//! Read from `INGEST_*` environment variables, falling back to the constants
//! below.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Public catalog of devices supported by Google Play.
pub const DEFAULT_SOURCE_URL: &str =
    "https://storage.googleapis.com/play_public/supported_devices.csv";

/// Upper bound for one download, headers and body included.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_USER_AGENT: &str = concat!("devicenames-ingest/", env!("CARGO_PKG_VERSION"));

/// Encoding assumed for sources that carry no byte-order mark.
///
/// A BOM always wins; this only matters for BOM-less files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Utf16Le,
}

impl FromStr for SourceEncoding {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
            "utf-16le" | "utf16le" | "utf-16" => Ok(SourceEncoding::Utf16Le),
            other => Err(IngestError::Config(format!(
                "Invalid source encoding '{}': expected utf-8 or utf-16le",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// URL of the CSV catalog
    pub source_url: String,
    /// Timeout for the whole GET request in seconds
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub source_encoding: SourceEncoding,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            source_encoding: SourceEncoding::default(),
        }
    }
}

impl IngestConfig {
    /// Load configuration from environment variables
    ///
    /// - `INGEST_SOURCE_URL`
    /// - `INGEST_FETCH_TIMEOUT_SECS`
    /// - `INGEST_USER_AGENT`
    /// - `INGEST_SOURCE_ENCODING` (`utf-8` or `utf-16le`)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            source_url: std::env::var("INGEST_SOURCE_URL").unwrap_or(defaults.source_url),
            fetch_timeout_secs: std::env::var("INGEST_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            user_agent: std::env::var("INGEST_USER_AGENT").unwrap_or(defaults.user_agent),
            source_encoding: match std::env::var("INGEST_SOURCE_ENCODING") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.source_encoding,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.source_url.starts_with("http://") || self.source_url.starts_with("https://")) {
            return Err(IngestError::Config(format!(
                "Source URL must be http(s): {}",
                self.source_url
            )));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(IngestError::Config(
                "Fetch timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
