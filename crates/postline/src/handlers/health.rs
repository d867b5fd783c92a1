//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /v1/health - Returns 200 while the server accepts connections.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
