pub mod forecast;
pub mod inventory;
pub mod simulated;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub async fn health(service: &'static str) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "service": service })))
}

pub async fn index() -> &'static str {
    "Pharma Supply Chain API Server is Running! Access inventory at /api/inventory"
}
