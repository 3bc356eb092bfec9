use serde::{Deserialize, Serialize};

use super::repo_types::Supplement;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplementRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    pub total_capsules: i32,
    #[serde(default = "one")]
    pub daily_frequency: i32,
    #[serde(default)]
    pub reminder_times: Vec<String>,
}

/// Full edit; `remaining_capsules` defaults to keeping the current stock.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSupplementRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    pub total_capsules: i32,
    pub remaining_capsules: Option<i32>,
    #[serde(default = "one")]
    pub daily_frequency: i32,
    #[serde(default)]
    pub reminder_times: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefillRequest {
    pub capsules: i32,
}

fn one() -> i32 {
    1
}

/// A supplement as the dashboard shows it.
#[derive(Debug, Serialize)]
pub struct SupplementCard {
    #[serde(flatten)]
    pub supplement: Supplement,
    pub doses_today: i64,
    pub complete_today: bool,
    pub stock_percentage: f64,
    pub days_left: i32,
}
