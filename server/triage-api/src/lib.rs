//! Log Triage API
//!
//! HTTP service exposing the triage pipeline. Analyze routes sit behind a
//! per-(client, route) token-bucket limiter. Bind to 127.0.0.1 by default.

mod config;
mod error;
mod handlers;
mod hf;
mod rate_limit;
mod state;
mod types;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{HfConfig, ServerConfig};
pub use error::{ApiError, ErrorResponse};
pub use handlers::{analyze, analyze_file, health};
pub use hf::HuggingFaceProvider;
pub use state::AppState;

pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/logs/analyze", post(analyze))
    .route("/api/logs/analyze/file", post(analyze_file))
    .layer(middleware::from_fn_with_state(state.clone(), rate_limit::rate_limit))
    .layer(DefaultBodyLimit::max(max_upload_bytes))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
