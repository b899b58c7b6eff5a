mod job;
mod service_config;
mod user;
mod vendor;

pub use job::Job;
pub use service_config::StaffServiceConfig;
pub use user::User;
pub use vendor::Vendor;

use serde::{Deserialize, Serialize};

/// Profile role. Stored as TEXT in the `users` table under a check
/// constraint, so unknown values can exist only if the constraint is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "MANAGER" => Some(Role::Manager),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    /// Default-safe mapping for the create path: ADMIN and MANAGER pass
    /// through, anything else (including absent) becomes USER.
    pub fn normalize(value: Option<&str>) -> Role {
        match value {
            Some("ADMIN") => Role::Admin,
            Some("MANAGER") => Role::Manager,
            _ => Role::User,
        }
    }
}

/// Job lifecycle status. PAUSE exists in stored data but is not a transition
/// target offered by the status handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    InProgress,
    Pause,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Pause => "PAUSE",
            JobStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<JobStatus> {
        match value {
            "PENDING" => Some(JobStatus::Pending),
            "IN_PROGRESS" => Some(JobStatus::InProgress),
            "PAUSE" => Some(JobStatus::Pause),
            "COMPLETED" => Some(JobStatus::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_normalize_defaults_to_user() {
        assert_eq!(Role::normalize(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::normalize(Some("MANAGER")), Role::Manager);
        assert_eq!(Role::normalize(Some("USER")), Role::User);
        assert_eq!(Role::normalize(Some("SUPERUSER")), Role::User);
        assert_eq!(Role::normalize(Some("admin")), Role::User);
        assert_eq!(Role::normalize(None), Role::User);
    }

    #[test]
    fn test_job_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::InProgress,
            JobStatus::Pause,
            JobStatus::Completed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("DONE"), None);
    }
}
