//! Job queue queries and status transitions.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Job, JobStatus};
use crate::database::store::StoreError;

use super::PageEnvelope;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Restrict to jobs assigned to this staff member (always set for USER
    /// callers).
    pub staff_id: Option<Uuid>,
    pub status: Option<JobStatus>,
}

/// Which lifecycle timestamps a transition stamps: IN_PROGRESS marks the
/// start, COMPLETED marks the finish. Other targets touch neither.
pub fn transition_stamps(status: JobStatus) -> (bool, bool) {
    match status {
        JobStatus::InProgress => (true, false),
        JobStatus::Completed => (false, true),
        JobStatus::Pending | JobStatus::Pause => (false, false),
    }
}

pub async fn list(
    pool: &PgPool,
    filter: &JobFilter,
    page: i64,
    limit: i64,
) -> Result<PageEnvelope<Job>, StoreError> {
    let mut count_query =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT COUNT(*) FROM jobs WHERE 1 = 1");
    push_filter(&mut count_query, filter);
    let count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT * FROM jobs WHERE 1 = 1");
    push_filter(&mut query, filter);
    query.push(" ORDER BY created_at DESC LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind((page - 1) * limit);

    let data: Vec<Job> = query.build_query_as().fetch_all(pool).await?;
    Ok(PageEnvelope::new(data, count, page, limit))
}

fn push_filter(query: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>, filter: &JobFilter) {
    if let Some(staff_id) = filter.staff_id {
        query.push(" AND staff_id = ");
        query.push_bind(staff_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status.as_str());
    }
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Job>, StoreError> {
    let row = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Apply a status transition, stamping `started_at`/`completed_at` as a side
/// effect and always refreshing `updated_at`.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: JobStatus,
) -> Result<Option<Job>, StoreError> {
    let (set_started, set_completed) = transition_stamps(status);

    let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE jobs SET updated_at = now()");
    query.push(", status = ");
    query.push_bind(status.as_str());
    if set_started {
        query.push(", started_at = now()");
    }
    if set_completed {
        query.push(", completed_at = now()");
    }
    query.push(" WHERE id = ");
    query.push_bind(id);
    query.push(" RETURNING *");

    let row = query.build_query_as().fetch_optional(pool).await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_stamps() {
        assert_eq!(transition_stamps(JobStatus::InProgress), (true, false));
        assert_eq!(transition_stamps(JobStatus::Completed), (false, true));
        assert_eq!(transition_stamps(JobStatus::Pending), (false, false));
        assert_eq!(transition_stamps(JobStatus::Pause), (false, false));
    }
}
