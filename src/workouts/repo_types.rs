use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day::iso_day;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub exercise_id: Option<Uuid>,
    pub exercise_name: Option<String>,
    #[serde(with = "iso_day")]
    pub date: Date,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
