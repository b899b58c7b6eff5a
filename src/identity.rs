//! Client for the hosted identity provider's administrative REST API.
//!
//! All provider failures are translated from the provider's native error
//! codes and HTTP statuses into [`IdentityError`]; the rest of the crate
//! never inspects provider message text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config;
use crate::database::models::Role;

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    EmailConflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Provider-reported referential restriction (identity deletion blocked
    /// by rows that still reference the user).
    #[error("{0}")]
    ForeignKey(String),

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fields forwarded to the provider when creating an Identity Record.
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: IdentityMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentityChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Administrative interface to the external identity provider.
///
/// A trait seam so the reconciliation unit can be exercised against an
/// in-memory fake.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, identity: &NewIdentity) -> Result<Uuid, IdentityError>;
    async fn update_user(&self, id: Uuid, changes: &IdentityChanges) -> Result<(), IdentityError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), IdentityError>;

    /// Resolve an end-user bearer token to the identity it belongs to.
    async fn resolve_token(&self, token: &str) -> Result<Uuid, IdentityError>;
}

pub struct GoTrueAdminClient {
    base_url: String,
    anon_key: String,
    service_role_key: String,
}

impl GoTrueAdminClient {
    pub fn from_config() -> Self {
        let identity = &config::config().identity;
        Self {
            base_url: identity.base_url.trim_end_matches('/').to_string(),
            anon_key: identity.anon_key.clone(),
            service_role_key: identity.service_role_key.clone(),
        }
    }

    fn admin_url(&self, suffix: &str) -> String {
        format!("{}/auth/v1/admin/users{}", self.base_url, suffix)
    }

    async fn into_identity_result(response: reqwest::Response) -> Result<Value, IdentityError> {
        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(response.json::<Value>().await.unwrap_or(Value::Null));
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(translate_error(status, &body))
    }
}

#[async_trait]
impl IdentityProvider for GoTrueAdminClient {
    async fn create_user(&self, identity: &NewIdentity) -> Result<Uuid, IdentityError> {
        let response = HTTP
            .post(self.admin_url(""))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(identity)
            .send()
            .await?;

        let body = Self::into_identity_result(response).await?;
        body.get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or(IdentityError::Provider {
                status: 200,
                message: "identity provider returned no user id".to_string(),
            })
    }

    async fn update_user(&self, id: Uuid, changes: &IdentityChanges) -> Result<(), IdentityError> {
        let response = HTTP
            .put(self.admin_url(&format!("/{}", id)))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(changes)
            .send()
            .await?;

        Self::into_identity_result(response).await.map(|_| ())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), IdentityError> {
        let response = HTTP
            .delete(self.admin_url(&format!("/{}", id)))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;

        Self::into_identity_result(response).await.map(|_| ())
    }

    async fn resolve_token(&self, token: &str) -> Result<Uuid, IdentityError> {
        let response = HTTP
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let body = Self::into_identity_result(response).await?;
        body.get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| IdentityError::Unauthorized("Invalid Session".to_string()))
    }
}

/// Map a provider error response to the local taxonomy by error code and
/// HTTP status, never by message wording.
fn translate_error(status: u16, body: &Value) -> IdentityError {
    let error_code = body.get("error_code").and_then(|v| v.as_str());
    // PostgREST-style responses carry a SQLSTATE in `code`
    let sqlstate = body.get("code").and_then(|v| v.as_str());
    let message = body
        .get("msg")
        .or_else(|| body.get("message"))
        .or_else(|| body.get("error_description"))
        .and_then(|v| v.as_str())
        .unwrap_or("identity provider error")
        .to_string();

    if error_code == Some("user_not_found") || status == 404 {
        return IdentityError::UserNotFound;
    }
    if error_code == Some("email_exists") || status == 409 {
        return IdentityError::EmailConflict(message);
    }
    if sqlstate == Some("23503") {
        return IdentityError::ForeignKey(message);
    }
    if status == 401 || status == 403 {
        return IdentityError::Unauthorized(message);
    }

    IdentityError::Provider { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_not_found_by_code() {
        let body = json!({ "error_code": "user_not_found", "msg": "anything at all" });
        assert!(matches!(
            translate_error(400, &body),
            IdentityError::UserNotFound
        ));
    }

    #[test]
    fn test_user_not_found_by_status() {
        assert!(matches!(
            translate_error(404, &Value::Null),
            IdentityError::UserNotFound
        ));
    }

    #[test]
    fn test_email_conflict() {
        let body = json!({ "error_code": "email_exists", "msg": "A user with this email address has already been registered" });
        match translate_error(422, &body) {
            IdentityError::EmailConflict(msg) => assert!(msg.contains("already been registered")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_foreign_key_by_sqlstate() {
        let body = json!({ "code": "23503", "message": "update or delete violates foreign key constraint" });
        assert!(matches!(
            translate_error(500, &body),
            IdentityError::ForeignKey(_)
        ));
    }

    #[test]
    fn test_unclassified_passes_message_through() {
        let body = json!({ "msg": "database timeout" });
        match translate_error(500, &body) {
            IdentityError::Provider { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database timeout");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
