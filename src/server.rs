//! HTTP server setup and configuration.
//!
//! The router and state here are shared by `imgreform serve` and the
//! integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::models::AppConfig;
use crate::services::ReformService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub reformer: Arc<ReformService>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    AppState {
        config: Arc::new(config),
        reformer: Arc::new(ReformService::new()),
    }
}

/// Build the API router with all endpoints and middleware.
///
/// Uploads larger than `max_upload_bytes` are rejected with 413 before the
/// handler runs.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/reform", post(api::handle_reform))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
