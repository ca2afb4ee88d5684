//! Shared domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup key of a device record.
///
/// Both parts are stored lowercased so that ingestion and queries agree on a
/// single case-insensitive form. Construct through [`DeviceKey::new`], which
/// performs the normalization; the marketing name is never part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceKey {
    retail_branding: String,
    model: String,
}

impl DeviceKey {
    pub fn new(retail_branding: &str, model: &str) -> Self {
        Self {
            retail_branding: retail_branding.to_lowercase(),
            model: model.to_lowercase(),
        }
    }

    pub fn retail_branding(&self) -> &str {
        &self.retail_branding
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.retail_branding, self.model)
    }
}
