//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

use super::{AppState, json_data};

/// Version string reported by the health endpoint.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /v1/health`. Reports liveness, the running version and the
/// deployment namespace.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    json_data(
        StatusCode::OK,
        json!({
            "status": "ok",
            "version": VERSION,
            "env": state.config.namespace,
        }),
    )
}
