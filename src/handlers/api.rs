use axum::response::Json;
use serde_json::{Value, json};

/// Health check handler
///
/// Returns `{"status":"OK"}` without touching the synthesis service.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK"
    }))
}
