// src/handlers/system.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::config::Config;

/// Stateless logout; tokens simply expire client-side.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "message": "Logged out successfully" }))
}

/// Deployment health check.
pub async fn health(State(config): State<Config>) -> impl IntoResponse {
    Json(json!({ "ok": true, "env": config.deployment.as_str() }))
}

/// Answer for paths that match neither a route nor a public file.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
