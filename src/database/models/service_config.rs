use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Commission configuration linking a staff profile to a service at a
/// percentage rate. Fully replaced (delete-all-then-insert) on staff edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffServiceConfig {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub percentage: Decimal,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
