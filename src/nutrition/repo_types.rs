use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::day::iso_day;

/// Targets and running totals of one user for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DailyGoals {
    #[serde(with = "iso_day")]
    pub date: Date,
    pub calories_target: i32,
    pub calories_consumed: i32,
    pub carbs_target: i32,
    pub carbs_consumed: i32,
    pub protein_target: i32,
    pub protein_consumed: i32,
    pub fat_target: i32,
    pub fat_consumed: i32,
    pub water_target: i32,
    pub water_consumed: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    #[serde(with = "iso_day")]
    pub date: Date,
    pub meal_type: String,
    pub food_name: String,
    pub calories: i32,
    pub carbs: i32,
    pub protein: i32,
    pub fat: i32,
    pub serving_size: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteMeal {
    pub id: Uuid,
    pub food_name: String,
    pub calories: i32,
    pub carbs: i32,
    pub protein: i32,
    pub fat: i32,
    pub serving_size: Option<String>,
    pub times_used: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
