//! Server-specific error types

use crate::api::response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devicenames_ingest::StoreError;
use thiserror::Error;

/// Errors not owned by a single feature
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(ref message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone()),
            AppError::StoreUnavailable(ref e) => {
                tracing::error!("Database health check failed: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UNAVAILABLE",
                    "Database is not reachable".to_string(),
                )
            },
        };

        ErrorResponse::new(code, message).into_response_with(status)
    }
}
