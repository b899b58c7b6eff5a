//! Administrative user management: the HTTP face of the reconciliation unit.
//!
//! These routes authenticate via the ambient session cookie and require the
//! ADMIN role. Handlers stay thin: guard, validate payload shape, delegate,
//! map the outcome to a response.

use axum::extract::Query;
use axum::http::HeaderMap;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Role, User};
use crate::database::store::{CommissionInput, PgStaffStore};
use crate::error::ApiError;
use crate::guard;
use crate::identity::GoTrueAdminClient;
use crate::services::staff_admin::{
    CreateStaff, DeleteOutcome, StaffAdminService, UpdateStaff,
};
use crate::services::users as user_service;
use crate::services::{normalize_page, PageEnvelope};
use crate::validation;

async fn staff_admin() -> Result<StaffAdminService<GoTrueAdminClient, PgStaffStore>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(StaffAdminService::new(
        GoTrueAdminClient::from_config(),
        PgStaffStore::new(pool),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub mobile: Option<String>,
}

/// POST /api/admin/create-user
pub async fn create_user(
    headers: HeaderMap,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let caller = guard::require_session(&headers).await?;
    guard::require_role(&caller, &[Role::Admin])?;

    let (email, password) = match (body.email, body.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    if !validation::is_valid_email(&email) {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if let Some(mobile) = &body.mobile {
        if !validation::is_valid_mobile(mobile) {
            return Err(ApiError::bad_request(
                "Invalid mobile number format. Must be 10 digits.",
            ));
        }
    }

    let role = Role::normalize(body.role.as_deref());

    let service = staff_admin().await?;
    let id = service
        .create(CreateStaff {
            email,
            password,
            name: body.name,
            role,
            mobile: body.mobile,
        })
        .await?;

    Ok(Json(json!({ "id": id })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
    pub commissions: Option<Vec<CommissionInput>>,
}

/// POST /api/admin/update-user
pub async fn update_user(
    headers: HeaderMap,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let caller = guard::require_session(&headers).await?;
    guard::require_role(&caller, &[Role::Admin])?;

    let id = body.id.ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    if let Some(email) = &body.email {
        if !validation::is_valid_email(email) {
            return Err(ApiError::bad_request("Invalid email format"));
        }
    }
    if let Some(mobile) = &body.mobile {
        if !validation::is_valid_mobile(mobile) {
            return Err(ApiError::bad_request(
                "Invalid mobile number format. Must be 10 digits.",
            ));
        }
    }

    // Role changes are strict here: an unknown value is an input error, not
    // something to silently downgrade.
    let role = match &body.role {
        Some(raw) => Some(
            Role::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid role value"))?,
        ),
        None => None,
    };

    let service = staff_admin().await?;
    service
        .update(
            id,
            UpdateStaff {
                name: body.name,
                email: body.email,
                mobile: body.mobile,
                role,
                password: body.password.filter(|p| !p.is_empty()),
                commissions: body.commissions,
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "User updated successfully"
    })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub id: Option<Uuid>,
}

/// DELETE /api/admin/delete-user
pub async fn delete_user(
    headers: HeaderMap,
    Json(body): Json<DeleteUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let caller = guard::require_session(&headers).await?;
    guard::require_role(&caller, &[Role::Admin])?;

    let id = body.id.ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    let service = staff_admin().await?;
    let message = delete_message(service.delete(id).await?);

    Ok(Json(json!({ "message": message })))
}

fn delete_message(outcome: DeleteOutcome) -> &'static str {
    match outcome {
        DeleteOutcome::Deleted => "User deleted successfully",
        DeleteOutcome::GhostCleanup => "Database-only user record cleaned up successfully",
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// GET /api/admin/users
pub async fn list_users(
    headers: HeaderMap,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PageEnvelope<User>>, ApiError> {
    let caller = guard::require_session(&headers).await?;
    guard::require_role(&caller, &[Role::Admin])?;

    let (page, limit) = normalize_page(query.page, query.limit);
    let pool = DatabaseManager::pool().await?;

    let envelope = user_service::list(&pool, page, limit, query.search.as_deref()).await?;
    Ok(Json(envelope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_message_distinguishes_ghost_cleanup() {
        assert_eq!(
            delete_message(DeleteOutcome::Deleted),
            "User deleted successfully"
        );
        assert_eq!(
            delete_message(DeleteOutcome::GhostCleanup),
            "Database-only user record cleaned up successfully"
        );
    }
}
