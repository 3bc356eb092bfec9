use time::OffsetDateTime;

use crate::error::{AppError, AppResult};

use super::{dto::ActiveFast, repo_types::FastingSession};

pub const MIN_FAST_HOURS: i32 = 12;
pub const MAX_FAST_HOURS: i32 = 23;
/// Goal shown when no fast is running.
pub const DEFAULT_GOAL_HOURS: i32 = 16;

/// Parses an `H:W` plan (fasting hours : eating window) into its target hours.
pub fn parse_plan(plan: &str) -> AppResult<(String, i32)> {
    let invalid = || AppError::validation(format!("invalid plan_type '{plan}', expected e.g. 16:8"));

    let plan = plan.trim();
    let (fast, window) = plan.split_once(':').ok_or_else(invalid)?;
    let fast: i32 = fast.trim().parse().map_err(|_| invalid())?;
    let window: i32 = window.trim().parse().map_err(|_| invalid())?;

    if fast + window != 24 {
        return Err(AppError::validation("plan hours must add up to 24"));
    }
    if !(MIN_FAST_HOURS..=MAX_FAST_HOURS).contains(&fast) {
        return Err(AppError::validation(format!(
            "fasting hours must be between {MIN_FAST_HOURS} and {MAX_FAST_HOURS}"
        )));
    }
    Ok((format!("{fast}:{window}"), fast))
}

/// Hours since `start`, rounded down to one decimal.
pub fn elapsed_hours(start: OffsetDateTime, now: OffsetDateTime) -> f64 {
    let secs = (now - start).whole_seconds().max(0) as f64;
    (secs / 3600.0 * 10.0).floor() / 10.0
}

pub fn is_completed(elapsed: f64, target_hours: i32) -> bool {
    elapsed >= f64::from(target_hours)
}

pub fn active_view(session: FastingSession, now: OffsetDateTime) -> ActiveFast {
    let elapsed = elapsed_hours(session.start_time, now);
    let target = f64::from(session.target_hours);
    let remaining = ((target - elapsed) * 10.0).round() / 10.0;
    ActiveFast {
        elapsed_hours: elapsed,
        remaining_hours: remaining.max(0.0),
        progress_pct: if target > 0.0 {
            (elapsed / target * 100.0).min(100.0)
        } else {
            100.0
        },
        session,
    }
}
