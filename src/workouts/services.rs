use time::Date;
use uuid::Uuid;

use crate::{
    day,
    error::{AppError, AppResult},
    validate,
};

use super::dto::LogWorkoutRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub exercise_id: Option<Uuid>,
    pub date: Date,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

fn counter(field: &str, v: Option<i32>) -> AppResult<Option<i32>> {
    v.map(|n| validate::non_negative(field, n)).transpose()
}

pub fn draft(req: LogWorkoutRequest) -> AppResult<WorkoutDraft> {
    if req.sets.is_none() && req.reps.is_none() && req.duration_minutes.is_none() {
        return Err(AppError::validation(
            "at least one of sets, reps or duration is required",
        ));
    }
    if let Some(w) = req.weight_kg {
        if !w.is_finite() || w < 0.0 {
            return Err(AppError::validation("weight must not be negative"));
        }
    }

    Ok(WorkoutDraft {
        exercise_id: req.exercise_id,
        date: req.date.unwrap_or_else(day::today),
        sets: counter("sets", req.sets)?,
        reps: counter("reps", req.reps)?,
        weight_kg: req.weight_kg,
        duration_minutes: counter("duration", req.duration_minutes)?,
        notes: validate::optional(req.notes),
    })
}

/// Blank filter values mean "any".
pub fn filter_value(v: Option<String>) -> Option<String> {
    validate::optional(v).map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_some_volume() {
        let err = draft(LogWorkoutRequest {
            weight_kg: Some(20.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn rejects_negative_numbers() {
        assert!(draft(LogWorkoutRequest {
            sets: Some(-3),
            ..Default::default()
        })
        .is_err());
        assert!(draft(LogWorkoutRequest {
            reps: Some(10),
            weight_kg: Some(-1.0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn duration_alone_is_enough() {
        let d = draft(LogWorkoutRequest {
            duration_minutes: Some(30),
            notes: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(d.duration_minutes, Some(30));
        assert_eq!(d.notes, None);
        assert_eq!(d.date, day::today());
    }

    #[test]
    fn request_accepts_short_names() {
        let req: LogWorkoutRequest =
            serde_json::from_str(r#"{"sets":3,"reps":12,"weight":40.5,"duration":20}"#).unwrap();
        assert_eq!(req.weight_kg, Some(40.5));
        assert_eq!(req.duration_minutes, Some(20));
    }

    #[test]
    fn filters_ignore_blank() {
        assert_eq!(filter_value(Some(" ".into())), None);
        assert_eq!(filter_value(Some("Strength".into())).as_deref(), Some("strength"));
    }
}
