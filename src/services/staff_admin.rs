//! Profile-Identity reconciliation and dependent-record cleanup.
//!
//! A staff member is two coupled records: an Identity Record owned by the
//! external identity provider, and a profile row in the `users` table. The
//! two are never created or destroyed atomically, so every mutation here is
//! an ordered sequence of external calls where partial completion is an
//! accepted, operator-visible terminal state. No step is retried; each step
//! is a no-op or safely re-runnable when the whole operation is retried.

use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Role;
use crate::database::store::{CommissionInput, NewProfile, ProfileChanges, StaffStore, StoreError};
use crate::identity::{IdentityChanges, IdentityError, IdentityMetadata, IdentityProvider, NewIdentity};

#[derive(Debug, Error)]
pub enum StaffAdminError {
    /// Identity provider rejected the operation; surfaced verbatim.
    #[error("{0}")]
    Provider(IdentityError),

    /// Identity Record exists without a matching profile row.
    #[error("{0}")]
    ProfileSync(String),

    #[error("{0}")]
    ConstraintViolation(String),

    #[error("{0}")]
    ForeignKeyViolation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct CreateStaff {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStaff {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
    pub commissions: Option<Vec<CommissionInput>>,
}

/// Distinct success outcomes for delete, so callers can tell a full delete
/// from a ghost-profile cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    GhostCleanup,
}

pub struct StaffAdminService<I, S> {
    identity: I,
    store: S,
}

impl<I: IdentityProvider, S: StaffStore> StaffAdminService<I, S> {
    pub fn new(identity: I, store: S) -> Self {
        Self { identity, store }
    }

    /// Create the Identity Record first, then ensure a profile row exists.
    ///
    /// Backends that sync profiles via trigger will already have inserted the
    /// row by the time we look; only insert when it is absent. An insert
    /// failure leaves an identity without a profile, which must be reported
    /// loudly rather than swallowed.
    pub async fn create(&self, req: CreateStaff) -> Result<Uuid, StaffAdminError> {
        let identity = NewIdentity {
            email: req.email.clone(),
            password: req.password,
            email_confirm: true,
            user_metadata: IdentityMetadata {
                name: req.name.clone(),
                role: req.role,
                mobile: req.mobile.clone(),
            },
        };

        let id = self
            .identity
            .create_user(&identity)
            .await
            .map_err(StaffAdminError::Provider)?;

        tracing::info!(user_id = %id, "identity record created");

        let exists = self.store.profile_exists(id).await.map_err(|e| {
            StaffAdminError::ProfileSync(format!(
                "Identity record {} created but profile lookup failed: {}",
                id, e
            ))
        })?;

        if !exists {
            let profile = NewProfile {
                id,
                email: req.email,
                name: req.name,
                role: req.role,
                mobile: req.mobile,
            };

            if let Err(e) = self.store.insert_profile(&profile).await {
                tracing::error!(user_id = %id, error = %e, "profile insert failed after identity creation");
                return Err(StaffAdminError::ProfileSync(
                    "Failed to create user profile in database".to_string(),
                ));
            }
        }

        Ok(id)
    }

    /// Apply changes to both records. Credential-bearing fields go to the
    /// identity provider first; a failure there aborts before the profile row
    /// is touched, so the two sides cannot diverge further. The profile
    /// update always refreshes `updated_at`, even with no changed fields.
    pub async fn update(&self, id: Uuid, req: UpdateStaff) -> Result<(), StaffAdminError> {
        if req.password.is_some() || req.email.is_some() {
            let changes = IdentityChanges {
                email: req.email.clone(),
                password: req.password.clone(),
            };
            self.identity
                .update_user(id, &changes)
                .await
                .map_err(StaffAdminError::Provider)?;
        }

        let changes = ProfileChanges {
            name: req.name,
            email: req.email,
            mobile: req.mobile,
            role: req.role,
        };
        match self.store.update_profile(id, &changes).await {
            Ok(()) => {}
            Err(StoreError::NotFound(msg)) => return Err(StaffAdminError::NotFound(msg)),
            Err(e) => return Err(e.into()),
        }

        if let Some(configs) = req.commissions {
            self.store
                .replace_commission_configs(id, &configs)
                .await
                .map_err(|e| {
                    StaffAdminError::ConstraintViolation(format!(
                        "Failed to replace commission configurations: {}",
                        e
                    ))
                })?;
        }

        Ok(())
    }

    /// Ordered cascading delete:
    ///
    /// 1. remove commission configurations,
    /// 2. null `staff_id` on referencing jobs,
    /// 3. delete the Identity Record, falling through to a direct profile
    ///    delete when the provider has no such user (ghost profile).
    ///
    /// Any failure is terminal for this request; a later retry re-runs the
    /// whole sequence, and the already-completed steps are no-ops.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteOutcome, StaffAdminError> {
        // Dependent cleanup failures are fatal across all dependent types: a
        // swallowed failure here would resurface later as a far less
        // actionable foreign-key error on the profile delete.
        let removed = self.store.delete_commission_configs(id).await.map_err(|e| {
            StaffAdminError::ConstraintViolation(format!(
                "Failed to remove commission configurations: {}",
                e
            ))
        })?;
        if removed > 0 {
            tracing::info!(user_id = %id, removed, "commission configurations removed");
        }

        match self.store.unassign_jobs(id).await {
            Ok(unassigned) => {
                if unassigned > 0 {
                    tracing::info!(user_id = %id, unassigned, "jobs detached from user");
                }
            }
            Err(StoreError::NotNull(_)) => {
                return Err(StaffAdminError::ConstraintViolation(
                    "Cannot detach jobs from this user: jobs.staff_id does not allow NULL. \
                     Reassign this user's jobs to another staff member first."
                        .to_string(),
                ));
            }
            Err(e) => {
                return Err(StaffAdminError::ConstraintViolation(format!(
                    "Failed to detach jobs from this user: {}",
                    e
                )));
            }
        }

        match self.identity.delete_user(id).await {
            Ok(()) => {
                tracing::info!(user_id = %id, "user deleted");
                Ok(DeleteOutcome::Deleted)
            }
            // Ghost profile: the provider has no such user, but a row may
            // still exist in the users table. Clean it up directly.
            Err(IdentityError::UserNotFound) => match self.store.delete_profile(id).await {
                Ok(0) => Err(StaffAdminError::NotFound("User not found".to_string())),
                Ok(_) => {
                    tracing::info!(user_id = %id, "ghost profile cleaned up");
                    Ok(DeleteOutcome::GhostCleanup)
                }
                Err(StoreError::ForeignKey(_)) => Err(StaffAdminError::ForeignKeyViolation(
                    "Cannot delete user: This user has active production jobs. \
                     Please reassign their jobs first."
                        .to_string(),
                )),
                Err(e) => Err(e.into()),
            },
            Err(IdentityError::ForeignKey(_)) => Err(StaffAdminError::ForeignKeyViolation(
                "Cannot delete user: This user is referenced in existing jobs.".to_string(),
            )),
            Err(e) => Err(StaffAdminError::Provider(e)),
        }
    }
}
