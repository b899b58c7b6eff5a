//! Health-check and echo routes. Unauthenticated; the GET variant reports
//! whether a valid session accompanied the request without ever failing on
//! its absence.

use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Value};

use crate::config;
use crate::error::ApiError;
use crate::guard;

/// GET /api/test
pub async fn status(headers: HeaderMap) -> Json<Value> {
    let (authorized, auth_error) = match guard::session_user_id(&headers) {
        Ok(Some(_)) => (true, None),
        Ok(None) => (false, None),
        Err(msg) => (false, Some(msg)),
    };

    Json(json!({
        "status": "ok",
        "service": config::config().service_name,
        "timestamp": chrono::Utc::now(),
        "auth_authorized": authorized,
        "auth_error": auth_error,
    }))
}

/// POST /api/test - echo the JSON body back
pub async fn echo(body: String) -> Result<Json<Value>, ApiError> {
    let value: Value = serde_json::from_str(&body)
        .map_err(|_| ApiError::bad_request("Invalid JSON body"))?;

    Ok(Json(json!({
        "status": "ok",
        "method": "POST",
        "echo": value,
    })))
}
