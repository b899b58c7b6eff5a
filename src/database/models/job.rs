use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Production job. `started_at`/`completed_at` are set as side effects of
/// status transitions, never directly by clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub service_id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub description: String,
    pub data_location: Option<String>,
    pub final_location: Option<String>,
    pub job_due_date: NaiveDate,
    pub staff_due_date: Option<NaiveDate>,
    pub status: String,
    pub amount: Decimal,
    pub commission_amount: Decimal,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
