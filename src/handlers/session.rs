//! Bridge between the two authorization conventions: exchanges a
//! provider-verified bearer token for the signed session cookie the admin
//! routes expect.

use axum::http::{header, HeaderMap};
use axum::response::Json;
use serde_json::{json, Value};

use crate::auth;
use crate::config;
use crate::error::ApiError;
use crate::guard;
use crate::identity::{GoTrueAdminClient, IdentityProvider};

/// POST /api/auth/session
pub async fn create_session(headers: HeaderMap) -> Result<(HeaderMap, Json<Value>), ApiError> {
    let token = guard::extract_bearer(&headers).map_err(ApiError::unauthorized)?;

    let identity = GoTrueAdminClient::from_config();
    let user_id = identity
        .resolve_token(&token)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid Session"))?;

    let session = auth::mint_session(user_id)?;

    let security = &config::config().security;
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        security.session_cookie,
        session,
        security.session_ttl_hours * 3600
    );

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::internal_server_error("Failed to issue session"))?,
    );

    Ok((response_headers, Json(json!({ "success": true }))))
}
