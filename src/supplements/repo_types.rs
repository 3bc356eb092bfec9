use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplement {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub total_capsules: i32,
    pub remaining_capsules: i32,
    pub daily_frequency: i32,
    pub reminder_times: Vec<String>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplementLog {
    pub id: Uuid,
    pub supplement_id: Uuid,
    pub supplement_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub taken_at: OffsetDateTime,
}

/// Validated fields for insert/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplementDraft {
    pub name: String,
    pub dosage: String,
    pub total_capsules: i32,
    pub remaining_capsules: i32,
    pub daily_frequency: i32,
    pub reminder_times: Vec<String>,
    pub status: &'static str,
}
