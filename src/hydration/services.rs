use time::Date;

use crate::error::{AppError, AppResult};

use super::{dto::WaterDay, repo_types::WaterLog};

pub const MAX_ENTRY_ML: i32 = 5000;

pub fn check_amount(amount_ml: i32) -> AppResult<i32> {
    if !(1..=MAX_ENTRY_ML).contains(&amount_ml) {
        return Err(AppError::validation(format!(
            "amount_ml must be between 1 and {MAX_ENTRY_ML}"
        )));
    }
    Ok(amount_ml)
}

/// Percentage of the goal reached, capped at 100.
pub fn progress_pct(total_ml: i32, goal_ml: i32) -> f64 {
    if goal_ml <= 0 {
        return if total_ml > 0 { 100.0 } else { 0.0 };
    }
    (f64::from(total_ml) / f64::from(goal_ml) * 100.0).min(100.0)
}

pub fn summarize(date: Date, entries: Vec<WaterLog>, goal_ml: i32) -> WaterDay {
    let total_ml = entries.iter().map(|e| e.amount_ml).sum();
    WaterDay {
        date,
        progress_pct: progress_pct(total_ml, goal_ml),
        entries,
        total_ml,
        goal_ml,
    }
}
