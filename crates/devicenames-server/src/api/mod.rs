pub mod response;

use crate::config::Config;
use crate::error::AppError;
use crate::features::{self, FeatureState};
use crate::middleware;
use axum::{extract::State, http::Uri, routing::get, Router};
use devicenames_ingest::store;
use devicenames_ingest::IngestPipeline;
use response::ApiResponse;
use serde::Serialize;
use sqlx::SqlitePool;
use std::future::Future;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub pipeline: IngestPipeline,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> anyhow::Result<Self> {
        let pipeline = IngestPipeline::new(db.clone(), &config.ingest)?;
        Ok(Self { db, pipeline })
    }
}

/// Bind the configured address and serve until `shutdown` resolves
pub async fn serve(
    config: &Config,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let feature_state = FeatureState {
        db: state.db.clone(),
        pipeline: state.pipeline.clone(),
    };

    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .merge(features::legacy_router(feature_state.clone()))
        .nest("/api/v1", features::router(feature_state))
        .fallback(not_found)
        .layer(middleware::tracing_layer())
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    database: &'static str,
}

async fn health(State(state): State<AppState>) -> Result<ApiResponse<HealthStatus>, AppError> {
    store::health_check(&state.db).await?;
    Ok(ApiResponse::success(HealthStatus {
        status: "healthy",
        database: "connected",
    }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
