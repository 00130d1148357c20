pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

const BYTES_PER_MB: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_request_body_mb
        .saturating_mul(BYTES_PER_MB);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/analyze_resumes",
            post(handlers::handle_analyze_resumes),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
