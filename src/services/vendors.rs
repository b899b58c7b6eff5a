//! Vendor CRUD and paginated search: thin pass-through to the database with
//! no business logic beyond ordering and range selection.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Vendor;
use crate::database::store::StoreError;

use super::PageEnvelope;

#[derive(Debug, Clone)]
pub struct NewVendor {
    pub studio_name: String,
    pub contact_person: String,
    pub mobile: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Partial update. `Some("")` on a nullable field clears it to NULL, matching
/// the dashboard's empty-input semantics.
#[derive(Debug, Clone, Default)]
pub struct VendorPatch {
    pub studio_name: Option<String>,
    pub contact_person: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

pub async fn list(
    pool: &PgPool,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> Result<PageEnvelope<Vendor>, StoreError> {
    let pattern = search
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s));

    let count: i64 = match &pattern {
        Some(p) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM vendors WHERE studio_name ILIKE $1 OR contact_person ILIKE $1",
            )
            .bind(p)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM vendors")
                .fetch_one(pool)
                .await?
        }
    };

    let offset = (page - 1) * limit;
    let data: Vec<Vendor> = match &pattern {
        Some(p) => {
            sqlx::query_as(
                "SELECT * FROM vendors WHERE studio_name ILIKE $1 OR contact_person ILIKE $1 \
                 ORDER BY studio_name LIMIT $2 OFFSET $3",
            )
            .bind(p)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM vendors ORDER BY studio_name LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(PageEnvelope::new(data, count, page, limit))
}

pub async fn create(pool: &PgPool, vendor: NewVendor) -> Result<Vendor, StoreError> {
    let row = sqlx::query_as(
        "INSERT INTO vendors (studio_name, contact_person, mobile, email, location, notes) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&vendor.studio_name)
    .bind(&vendor.contact_person)
    .bind(&vendor.mobile)
    .bind(&vendor.email)
    .bind(&vendor.location)
    .bind(&vendor.notes)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Vendor>, StoreError> {
    let row = sqlx::query_as("SELECT * FROM vendors WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn update(pool: &PgPool, id: Uuid, patch: VendorPatch) -> Result<Option<Vendor>, StoreError> {
    let mut query =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE vendors SET updated_at = now()");

    if let Some(studio_name) = &patch.studio_name {
        query.push(", studio_name = ");
        query.push_bind(studio_name);
    }
    if let Some(contact_person) = &patch.contact_person {
        query.push(", contact_person = ");
        query.push_bind(contact_person);
    }
    if let Some(mobile) = &patch.mobile {
        query.push(", mobile = ");
        query.push_bind(mobile);
    }
    push_nullable(&mut query, "email", &patch.email);
    push_nullable(&mut query, "location", &patch.location);
    push_nullable(&mut query, "notes", &patch.notes);

    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(" RETURNING *");

    let row = query.build_query_as().fetch_optional(pool).await?;
    Ok(row)
}

fn push_nullable<'a>(
    query: &mut sqlx::QueryBuilder<'a, sqlx::Postgres>,
    column: &str,
    value: &'a Option<String>,
) {
    match value {
        Some(v) if v.is_empty() => {
            query.push(format!(", {} = NULL", column));
        }
        Some(v) => {
            query.push(format!(", {} = ", column));
            query.push_bind(v);
        }
        None => {}
    }
}

/// Returns rows deleted; a foreign-key rejection means jobs still reference
/// the vendor and is surfaced as [`StoreError::ForeignKey`].
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, StoreError> {
    let result = sqlx::query("DELETE FROM vendors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
