use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::day::iso_day;

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseFilter {
    pub category: Option<String>,
    pub muscle_group: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogWorkoutRequest {
    pub exercise_id: Option<Uuid>,
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    #[serde(alias = "duration")]
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}
