//! Job queue routes. Bearer-token authenticated; staff (USER role) callers
//! are restricted to their own assigned jobs.

use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Job, JobStatus, Role};
use crate::error::ApiError;
use crate::guard;
use crate::services::jobs as job_service;
use crate::services::jobs::JobFilter;
use crate::services::{normalize_page, PageEnvelope};

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub staff_id: Option<Uuid>,
}

/// GET /api/jobs
pub async fn list(
    headers: HeaderMap,
    Query(query): Query<JobListQuery>,
) -> Result<Json<PageEnvelope<Job>>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, &[Role::Admin, Role::Manager, Role::User])?;

    let status = match query.status.as_deref() {
        Some(raw) => {
            Some(JobStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status value"))?)
        }
        None => None,
    };

    // Staff only ever see their own queue, regardless of the filter they ask
    // for. Admins and managers may scope to any staff member.
    let staff_id = match caller.role {
        Role::User => Some(caller.id),
        Role::Admin | Role::Manager => query.staff_id,
    };

    let (page, limit) = normalize_page(query.page, query.limit);
    let pool = DatabaseManager::pool().await?;

    let envelope = job_service::list(&pool, &JobFilter { staff_id, status }, page, limit).await?;
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// PATCH /api/jobs/:id/status
pub async fn update_status(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Job>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, &[Role::Admin, Role::Manager, Role::User])?;

    let status = body
        .status
        .as_deref()
        .and_then(JobStatus::parse)
        .ok_or_else(|| ApiError::bad_request("Invalid status value"))?;

    // PAUSE exists in stored data but is not an offered transition target.
    if status == JobStatus::Pause {
        return Err(ApiError::bad_request("Invalid status value"));
    }

    let pool = DatabaseManager::pool().await?;

    let job = job_service::fetch(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    ensure_own_job(&caller, job.staff_id)?;

    match job_service::update_status(&pool, id, status).await? {
        Some(updated) => Ok(Json(updated)),
        None => Err(ApiError::not_found("Job not found")),
    }
}

/// Staff may only touch jobs assigned to them; admins and managers may touch
/// any job.
fn ensure_own_job(caller: &guard::AuthUser, job_staff_id: Option<Uuid>) -> Result<(), ApiError> {
    if caller.role == Role::User && job_staff_id != Some(caller.id) {
        return Err(ApiError::forbidden(
            "Access Denied: You can only update your own jobs",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::AuthUser;

    #[test]
    fn test_staff_cannot_touch_another_staff_members_job() {
        let caller = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };

        let err = ensure_own_job(&caller, Some(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.message(), "Access Denied: You can only update your own jobs");

        let err = ensure_own_job(&caller, None).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_staff_may_touch_own_job() {
        let caller = AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(ensure_own_job(&caller, Some(caller.id)).is_ok());
    }

    #[test]
    fn test_managers_and_admins_touch_any_job() {
        for role in [Role::Admin, Role::Manager] {
            let caller = AuthUser {
                id: Uuid::new_v4(),
                role,
            };
            assert!(ensure_own_job(&caller, Some(Uuid::new_v4())).is_ok());
            assert!(ensure_own_job(&caller, None).is_ok());
        }
    }
}
