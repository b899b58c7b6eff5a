use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub service_name: String,
    pub identity: IdentityConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
}

/// Connection details for the hosted identity/database service.
///
/// Two distinct credentials exist on purpose: the anon key is only good for
/// resolving end-user bearer tokens, while the service-role key unlocks the
/// administrative user-management endpoints and must never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    pub anon_key: String,
    pub service_role_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub session_secret: String,
    pub session_cookie: String,
    pub session_ttl_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let identity = IdentityConfig {
            base_url: env_or_warn("SUPABASE_URL"),
            anon_key: env_or_warn("SUPABASE_ANON_KEY"),
            service_role_key: env_or_warn("SUPABASE_SERVICE_ROLE_KEY"),
        };

        let security = SecurityConfig {
            session_secret: env_or_warn("SESSION_SECRET"),
            session_cookie: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "studio_session".to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        };

        let database = DatabaseConfig {
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        };

        Self {
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "Studio Production API".to_string()),
            identity,
            security,
            database,
        }
    }
}

fn env_or_warn(key: &str) -> String {
    match env::var(key) {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!("{} is not set; dependent operations will fail", key);
            String::new()
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = AppConfig::from_env();
        assert_eq!(config.security.session_cookie, "studio_session");
        assert_eq!(config.security.session_ttl_hours, 24);
        assert_eq!(config.database.max_connections, 10);
    }
}
