use axum::Json;
use serde_json::{json, Value};

/// GET /health
///
/// Liveness check for the screener. Does not touch the language model, so it
/// stays green when `GOOGLE_API_KEY` is unset and analysis runs hard-score only.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener"
    }))
}
