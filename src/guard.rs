//! Role-gated request authorization.
//!
//! Two caller conventions coexist deliberately: dashboard actions carry an
//! ambient session cookie, API clients carry an `Authorization: Bearer`
//! token resolved through the identity provider. Both paths end the same
//! way: the caller's profile row is loaded and its role checked against the
//! operation's allowed set. The guard is read-only and runs before any
//! mutating logic.

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::auth;
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::Role;
use crate::database::store::{PgStaffStore, StaffStore};
use crate::error::ApiError;
use crate::identity::{GoTrueAdminClient, IdentityProvider};

const ACCESS_DENIED: &str = "Access Denied: Admin privileges required";

/// Authenticated caller context.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// Extract a bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err("Empty bearer token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_name = &config::config().security.session_cookie;
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name.as_str()).then(|| value.to_string())
    })
}

/// Identify the session-cookie caller without touching the database.
/// Ok(None) means no cookie was presented at all.
pub fn session_user_id(headers: &HeaderMap) -> Result<Option<Uuid>, String> {
    match session_cookie(headers) {
        Some(token) => auth::verify_session(&token).map(|claims| Some(claims.sub)),
        None => Ok(None),
    }
}

/// Authenticate an admin-route caller via the ambient session cookie.
pub async fn require_session(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let user_id = match session_user_id(headers) {
        Ok(Some(id)) => id,
        Ok(None) => return Err(ApiError::unauthorized("Unauthorized")),
        Err(msg) => return Err(ApiError::unauthorized(msg)),
    };

    resolve_role(user_id).await
}

/// Authenticate an API-route caller via bearer token and the identity
/// provider.
pub async fn require_bearer(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = extract_bearer(headers).map_err(|_| ApiError::unauthorized("Unauthorized"))?;

    let identity = GoTrueAdminClient::from_config();
    let user_id = identity
        .resolve_token(&token)
        .await
        .map_err(|e| {
            tracing::debug!("bearer token rejected: {}", e);
            ApiError::unauthorized("Invalid Session")
        })?;

    resolve_role(user_id).await
}

/// The caller is identified; read their role from the profile row. A missing
/// or unreadable profile means the caller is known but unauthorized, so this
/// is Forbidden rather than Unauthenticated.
async fn resolve_role(user_id: Uuid) -> Result<AuthUser, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let store = PgStaffStore::new(pool);

    match store.fetch_role(user_id).await {
        Ok(Some(role)) => Ok(AuthUser { id: user_id, role }),
        Ok(None) => Err(ApiError::forbidden(ACCESS_DENIED)),
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "profile role lookup failed");
            Err(ApiError::forbidden(ACCESS_DENIED))
        }
    }
}

pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(ACCESS_DENIED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(extract_bearer(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_extract_bearer_rejects_missing_and_malformed() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert!(extract_bearer(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer(&headers).is_err());
    }

    #[test]
    fn test_require_role() {
        let admin = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let staff = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };

        assert!(require_role(&admin, &[Role::Admin]).is_ok());
        assert!(require_role(&staff, &[Role::Admin]).is_err());
        assert!(require_role(&staff, &[Role::Admin, Role::Manager, Role::User]).is_ok());
    }

    #[test]
    fn test_session_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; studio_session=tok; theme=dark"),
        );
        assert_eq!(session_cookie(&headers), Some("tok".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("other=1"));
        assert_eq!(session_cookie(&headers), None);
    }
}
