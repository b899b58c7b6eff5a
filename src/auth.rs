use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Claims carried by the `studio_session` cookie.
///
/// The cookie only identifies the caller; the role is always re-read from the
/// `users` table at request time so demotions take effect immediately.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let ttl_hours = config::config().security.session_ttl_hours;
        Self {
            sub: user_id,
            exp: (now + Duration::hours(ttl_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("session token generation failed: {0}")]
    TokenGeneration(String),
    #[error("session secret not configured")]
    InvalidSecret,
}

pub fn mint_session(user_id: Uuid) -> Result<String, JwtError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &SessionClaims::new(user_id), &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_session(token: &str) -> Result<SessionClaims, String> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err("Session secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<SessionClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid session token: {}", e))
}
