use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day::iso_day;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Streak {
    pub streak_type: String,
    pub current_count: i32,
    pub best_count: i32,
    #[serde(with = "iso_day")]
    pub last_active_on: Date,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub unlocked_at: OffsetDateTime,
}
