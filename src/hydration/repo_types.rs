use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day::iso_day;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WaterLog {
    pub id: Uuid,
    #[serde(with = "iso_day")]
    pub date: Date,
    pub amount_ml: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
