use serde::Serialize;
use time::Date;

use crate::day::iso_day;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    #[serde(with = "iso_day")]
    pub date: Date,
    pub calories: i32,
    pub calories_goal: i32,
    pub protein: i32,
    pub protein_goal: i32,
    pub carbs: i32,
    pub carbs_goal: i32,
    pub fats: i32,
    pub fats_goal: i32,
    pub water_ml: i32,
    pub water_goal_ml: i32,
    pub fasting_hours: f64,
    pub fasting_goal_hours: i32,
    pub workouts_today: i64,
    pub supplements_taken: i64,
    pub supplements_total: i64,
    pub current_streak: i32,
}
