use devicenames_common::DeviceKey;
use devicenames_ingest::store;
use devicenames_ingest::StoreError;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Request body of a lookup; both fields are matched case-insensitively
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupDeviceQuery {
    pub retail_branding: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupDeviceError {
    #[error("Device not found")]
    NotFound,
    #[error("Database query error: {0}")]
    Database(#[from] StoreError),
}

impl LookupDeviceQuery {
    pub fn key(&self) -> DeviceKey {
        DeviceKey::new(&self.retail_branding, &self.model)
    }
}

/// Marketing name for the queried device
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: LookupDeviceQuery) -> Result<String, LookupDeviceError> {
    let key = query.key();
    store::find_marketing_name(&pool, &key)
        .await?
        .ok_or(LookupDeviceError::NotFound)
}
