//! Profile/dependent-record access for the staff reconciliation unit.
//!
//! Database rejections are classified by SQLSTATE code, not by message text,
//! so the taxonomy survives wording changes in the backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::models::Role;

const SQLSTATE_NOT_NULL: &str = "23502";
const SQLSTATE_FOREIGN_KEY: &str = "23503";
const SQLSTATE_UNIQUE: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ForeignKey(String),

    #[error("{0}")]
    NotNull(String),

    #[error("{0}")]
    Unique(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let classified = err
            .as_database_error()
            .and_then(|db| db.code().map(|code| (code.into_owned(), db.message().to_string())));

        match classified {
            Some((code, message)) => classify_sqlstate(&code, message, err),
            None => StoreError::Sqlx(err),
        }
    }
}

fn classify_sqlstate(code: &str, message: String, original: sqlx::Error) -> StoreError {
    match code {
        SQLSTATE_NOT_NULL => StoreError::NotNull(message),
        SQLSTATE_FOREIGN_KEY => StoreError::ForeignKey(message),
        SQLSTATE_UNIQUE => StoreError::Unique(message),
        _ => StoreError::Sqlx(original),
    }
}

/// Profile row insert performed when the identity provider did not sync one
/// automatically.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub mobile: Option<String>,
}

/// Field subset applied to a profile row on update. `updated_at` is always
/// refreshed, even when every field here is None.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionInput {
    pub service_id: Uuid,
    pub percentage: Decimal,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Storage seam for the reconciliation and cleanup units.
#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn profile_exists(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn fetch_role(&self, id: Uuid) -> Result<Option<Role>, StoreError>;
    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), StoreError>;
    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<(), StoreError>;

    /// Returns the number of rows deleted (0 when the profile was absent).
    async fn delete_profile(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn delete_commission_configs(&self, staff_id: Uuid) -> Result<u64, StoreError>;
    async fn replace_commission_configs(
        &self,
        staff_id: Uuid,
        configs: &[CommissionInput],
    ) -> Result<(), StoreError>;

    /// Null out `staff_id` on every job assigned to this user.
    async fn unassign_jobs(&self, staff_id: Uuid) -> Result<u64, StoreError>;
}

pub struct PgStaffStore {
    pool: PgPool,
}

impl PgStaffStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffStore for PgStaffStore {
    async fn profile_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn fetch_role(&self, id: Uuid) -> Result<Option<Role>, StoreError> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role.as_deref().and_then(Role::parse))
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, role, mobile) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(profile.role.as_str())
        .bind(&profile.mobile)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<(), StoreError> {
        let mut query =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE users SET updated_at = now()");

        if let Some(name) = &changes.name {
            query.push(", name = ");
            query.push_bind(name);
        }
        if let Some(email) = &changes.email {
            query.push(", email = ");
            query.push_bind(email);
        }
        if let Some(mobile) = &changes.mobile {
            query.push(", mobile = ");
            query.push_bind(mobile);
        }
        if let Some(role) = changes.role {
            query.push(", role = ");
            query.push_bind(role.as_str());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn delete_profile(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_commission_configs(&self, staff_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM staff_service_configs WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn replace_commission_configs(
        &self,
        staff_id: Uuid,
        configs: &[CommissionInput],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM staff_service_configs WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&mut *tx)
            .await?;

        for config in configs {
            sqlx::query(
                "INSERT INTO staff_service_configs (staff_id, service_id, percentage, due_date) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(staff_id)
            .bind(config.service_id)
            .bind(config.percentage)
            .bind(config.due_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn unassign_jobs(&self, staff_id: Uuid) -> Result<u64, StoreError> {
        let result =
            sqlx::query("UPDATE jobs SET staff_id = NULL, updated_at = now() WHERE staff_id = $1")
                .bind(staff_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(code: &str) -> StoreError {
        classify_sqlstate(code, "boom".to_string(), sqlx::Error::RowNotFound)
    }

    #[test]
    fn test_sqlstate_classification() {
        assert!(matches!(classify("23502"), StoreError::NotNull(_)));
        assert!(matches!(classify("23503"), StoreError::ForeignKey(_)));
        assert!(matches!(classify("23505"), StoreError::Unique(_)));
        assert!(matches!(classify("42P01"), StoreError::Sqlx(_)));
    }
}
