//! Vendor CRUD routes. Bearer-token authenticated, ADMIN or MANAGER only.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Role, Vendor};
use crate::database::store::StoreError;
use crate::error::ApiError;
use crate::guard;
use crate::services::vendors as vendor_service;
use crate::services::vendors::{NewVendor, VendorPatch};
use crate::services::{normalize_page, PageEnvelope};
use crate::validation;

const VENDOR_ROLES: &[Role] = &[Role::Admin, Role::Manager];

fn validate_contact_fields(mobile: Option<&str>, email: Option<&str>) -> Result<(), ApiError> {
    if let Some(mobile) = mobile {
        if !validation::is_valid_mobile(mobile) {
            return Err(ApiError::bad_request(
                "Invalid mobile number format. Must be 10 digits.",
            ));
        }
    }
    if let Some(email) = email {
        if !email.is_empty() && !validation::is_valid_email(email) {
            return Err(ApiError::bad_request("Invalid email format"));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct VendorListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// GET /api/vendors
pub async fn list(
    headers: HeaderMap,
    Query(query): Query<VendorListQuery>,
) -> Result<Json<PageEnvelope<Vendor>>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, VENDOR_ROLES)?;

    let (page, limit) = normalize_page(query.page, query.limit);
    let pool = DatabaseManager::pool().await?;

    let envelope = vendor_service::list(&pool, page, limit, query.search.as_deref()).await?;
    Ok(Json(envelope))
}

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub studio_name: Option<String>,
    pub contact_person: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/vendors
pub async fn create(
    headers: HeaderMap,
    Json(body): Json<CreateVendorRequest>,
) -> Result<(StatusCode, Json<Vendor>), ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, VENDOR_ROLES)?;

    let (studio_name, contact_person, mobile) =
        match (body.studio_name, body.contact_person, body.mobile) {
            (Some(s), Some(c), Some(m)) if !s.is_empty() && !c.is_empty() && !m.is_empty() => {
                (s, c, m)
            }
            _ => {
                return Err(ApiError::bad_request(
                    "Missing required fields: studio_name, contact_person, mobile",
                ))
            }
        };

    validate_contact_fields(Some(&mobile), body.email.as_deref())?;

    let pool = DatabaseManager::pool().await?;
    let vendor = vendor_service::create(
        &pool,
        NewVendor {
            studio_name,
            contact_person,
            mobile,
            email: body.email.filter(|e| !e.is_empty()),
            location: body.location.filter(|l| !l.is_empty()),
            notes: body.notes.filter(|n| !n.is_empty()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

/// GET /api/vendors/:id
pub async fn get(headers: HeaderMap, Path(id): Path<Uuid>) -> Result<Json<Vendor>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, VENDOR_ROLES)?;

    let pool = DatabaseManager::pool().await?;
    match vendor_service::fetch(&pool, id).await? {
        Some(vendor) => Ok(Json(vendor)),
        None => Err(ApiError::not_found("Vendor not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateVendorRequest {
    pub studio_name: Option<String>,
    pub contact_person: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// PUT /api/vendors/:id
pub async fn update(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateVendorRequest>,
) -> Result<Json<Vendor>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, VENDOR_ROLES)?;

    validate_contact_fields(body.mobile.as_deref(), body.email.as_deref())?;

    let pool = DatabaseManager::pool().await?;
    let patch = VendorPatch {
        studio_name: body.studio_name,
        contact_person: body.contact_person,
        mobile: body.mobile,
        email: body.email,
        location: body.location,
        notes: body.notes,
    };

    match vendor_service::update(&pool, id, patch).await? {
        Some(vendor) => Ok(Json(vendor)),
        None => Err(ApiError::not_found("Vendor not found")),
    }
}

/// DELETE /api/vendors/:id
pub async fn delete(headers: HeaderMap, Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    let caller = guard::require_bearer(&headers).await?;
    guard::require_role(&caller, VENDOR_ROLES)?;

    let pool = DatabaseManager::pool().await?;
    delete_response(vendor_service::delete(&pool, id).await)
}

/// A foreign-key rejection means jobs still reference the vendor; the row is
/// untouched and the caller gets a Conflict rather than a generic failure.
fn delete_response(result: Result<u64, StoreError>) -> Result<Json<Value>, ApiError> {
    match result {
        Ok(_) => Ok(Json(json!({ "message": "Vendor deleted successfully" }))),
        Err(StoreError::ForeignKey(_)) => Err(ApiError::conflict(
            "Cannot delete vendor. It is being used by existing jobs.",
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_referenced_vendor_yields_conflict() {
        let err = delete_response(Err(StoreError::ForeignKey(
            "update or delete on table \"vendors\" violates foreign key constraint".to_string(),
        )))
        .unwrap_err();

        assert_eq!(err.status_code(), 409);
        assert_eq!(
            err.message(),
            "Cannot delete vendor. It is being used by existing jobs."
        );
    }

    #[test]
    fn test_delete_success_message() {
        let body = delete_response(Ok(1)).unwrap().0;
        assert_eq!(body["message"], "Vendor deleted successfully");
    }

    #[test]
    fn test_delete_other_store_errors_pass_through() {
        let err = delete_response(Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
