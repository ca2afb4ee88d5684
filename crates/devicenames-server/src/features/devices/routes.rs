//! Device API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/devices/lookup` - Marketing name for a branding and model
//! - `POST /api/v1/devices/ingest` - Run one catalog ingestion
//!
//! The same handlers are mounted at the root as `POST /get-device-name` and
//! `POST /update-devices` for existing clients.

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::{
    commands::TriggerIngestError,
    queries::{LookupDeviceError, LookupDeviceQuery},
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Routes nested under `/api/v1/devices`
pub fn devices_routes() -> Router<FeatureState> {
    Router::new()
        .route("/lookup", post(lookup_device))
        .route("/ingest", post(trigger_ingest))
}

/// Root-level paths kept for clients of the first API
pub fn legacy_routes() -> Router<FeatureState> {
    Router::new()
        .route("/get-device-name", post(lookup_device))
        .route("/update-devices", post(trigger_ingest))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Look up a device's marketing name
///
/// # Request Body
///
/// ```json
/// { "retail_branding": "Samsung", "model": "SM-G991B" }
/// ```
///
/// # Response
///
/// - `200 OK` - `{ "success": true, "data": "Galaxy S21 5G" }`
/// - `400 Bad Request` - Body is not a lookup request
/// - `404 Not Found` - No device stored under that key
/// - `500 Internal Server Error` - Database error
async fn lookup_device(
    State(state): State<FeatureState>,
    payload: Result<Json<LookupDeviceQuery>, JsonRejection>,
) -> Result<Response, DeviceApiError> {
    let Json(query) = payload?;
    let name = super::queries::lookup::handle(state.db, query).await?;
    Ok(ApiResponse::success(name).into_response())
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Fetch the catalog and ingest it, answering once the run has finished
///
/// # Response
///
/// - `200 OK` - Run summary
/// - `409 Conflict` - Another run is in progress
/// - `500 Internal Server Error` - The run failed; nothing was committed
async fn trigger_ingest(State(state): State<FeatureState>) -> Result<Response, DeviceApiError> {
    let summary = super::commands::ingest::handle(state.pipeline).await?;
    Ok(ApiResponse::success(summary).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum DeviceApiError {
    InvalidBody(JsonRejection),
    Lookup(LookupDeviceError),
    Ingest(TriggerIngestError),
}

impl From<JsonRejection> for DeviceApiError {
    fn from(err: JsonRejection) -> Self {
        Self::InvalidBody(err)
    }
}

impl From<LookupDeviceError> for DeviceApiError {
    fn from(err: LookupDeviceError) -> Self {
        Self::Lookup(err)
    }
}

impl From<TriggerIngestError> for DeviceApiError {
    fn from(err: TriggerIngestError) -> Self {
        Self::Ingest(err)
    }
}

impl IntoResponse for DeviceApiError {
    fn into_response(self) -> Response {
        match self {
            DeviceApiError::InvalidBody(rejection) => {
                ErrorResponse::new("BAD_REQUEST", format!("Invalid JSON body: {}", rejection.body_text()))
                    .into_response_with(StatusCode::BAD_REQUEST)
            },
            DeviceApiError::Lookup(LookupDeviceError::NotFound) => {
                ErrorResponse::new("NOT_FOUND", "Device not found")
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            DeviceApiError::Lookup(LookupDeviceError::Database(e)) => {
                tracing::error!("Database error during device lookup: {}", e);
                ErrorResponse::new("INTERNAL_ERROR", "Database query error")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
            DeviceApiError::Ingest(TriggerIngestError::AlreadyRunning) => {
                ErrorResponse::new("CONFLICT", "An ingestion run is already in progress")
                    .into_response_with(StatusCode::CONFLICT)
            },
            DeviceApiError::Ingest(e @ TriggerIngestError::Failed(_)) => {
                tracing::error!("Failed to update devices: {}", e);
                ErrorResponse::new("INGEST_FAILED", e.to_string())
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}
