use serde::Deserialize;
use time::Date;

use crate::day::iso_day;

#[derive(Debug, Clone, Deserialize)]
pub struct GoalsRequest {
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
    pub calories_target: i32,
    pub carbs_target: i32,
    pub protein_target: i32,
    pub fat_target: i32,
    pub water_target: i32,
}

/// Food and macros shared by meals and favourites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodRequest {
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub carbs: i32,
    #[serde(default)]
    pub protein: i32,
    #[serde(default)]
    pub fat: i32,
    pub serving_size: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealRequest {
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
    #[serde(default)]
    pub meal_type: String,
    #[serde(flatten)]
    pub food: FoodRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogFavoriteRequest {
    #[serde(default)]
    pub meal_type: String,
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
}
