/*
 * Responsibility
 * - GET /healthz (疎通用, 認証なし)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "OK", "timestamp": chrono::Utc::now().to_rfc3339() })),
    )
}
