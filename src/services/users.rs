//! Paginated profile listing for the admin dashboard.

use sqlx::PgPool;

use crate::database::models::User;
use crate::database::store::StoreError;

use super::PageEnvelope;

pub async fn list(
    pool: &PgPool,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> Result<PageEnvelope<User>, StoreError> {
    let pattern = search
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s));

    let count: i64 = match &pattern {
        Some(p) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name ILIKE $1 OR email ILIKE $1")
                .bind(p)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?
        }
    };

    let offset = (page - 1) * limit;
    let data: Vec<User> = match &pattern {
        Some(p) => {
            sqlx::query_as(
                "SELECT * FROM users WHERE name ILIKE $1 OR email ILIKE $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(p)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(PageEnvelope::new(data, count, page, limit))
}
