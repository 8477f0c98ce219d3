pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/text", post(handlers::handle_analyze_text))
        // Single-document tools
        .route("/api/v1/jd/audit", post(handlers::handle_jd_audit))
        .route("/api/v1/skill-gap", post(handlers::handle_skill_gap))
        .route("/api/v1/redact", post(handlers::handle_redact))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
