use serde::{Deserialize, Serialize};
use time::Date;

use crate::day::iso_day;

use super::repo_types::WaterLog;

#[derive(Debug, Deserialize)]
pub struct AddWaterRequest {
    pub amount_ml: i32,
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct WaterDay {
    #[serde(with = "iso_day")]
    pub date: Date,
    pub entries: Vec<WaterLog>,
    pub total_ml: i32,
    pub goal_ml: i32,
    pub progress_pct: f64,
}
