//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /ping
pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}
