// irms-backend/src/api/handlers/system_handler.rs

use crate::api::AppState;
use axum::{extract::Json, routing::get, Router};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check_handler))
}

pub async fn health_check_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
