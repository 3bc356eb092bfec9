use crate::error::{AppError, AppResult};

use super::dto::UpsertProfileRequest;

pub const GOALS: &[&str] = &[
    "lose_weight",
    "gain_muscle",
    "tone_body",
    "improve_health",
    "maintain",
];
pub const EXPERIENCE_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

fn check_range(name: &str, value: Option<f64>, min: f64, max: f64) -> AppResult<()> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(AppError::validation(format!(
            "{name} must be between {min} and {max}"
        ))),
        _ => Ok(()),
    }
}

/// Trims free-text fields (blank becomes `None`) and checks ranges and enums.
pub fn normalize(mut req: UpsertProfileRequest) -> AppResult<UpsertProfileRequest> {
    for field in [&mut req.gender, &mut req.goal, &mut req.fitness_experience] {
        *field = field
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }

    check_range("age", req.age.map(f64::from), 13.0, 120.0)?;
    check_range("height_cm", req.height_cm, 50.0, 272.0)?;
    check_range("current_weight_kg", req.current_weight_kg, 20.0, 400.0)?;
    check_range("target_weight_kg", req.target_weight_kg, 20.0, 400.0)?;

    if let Some(goal) = req.goal.as_deref() {
        if !GOALS.contains(&goal) {
            return Err(AppError::validation(format!("unknown goal '{goal}'")));
        }
    }
    if let Some(level) = req.fitness_experience.as_deref() {
        if !EXPERIENCE_LEVELS.contains(&level) {
            return Err(AppError::validation(format!(
                "unknown fitness_experience '{level}'"
            )));
        }
    }
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_become_none() {
        let req = normalize(UpsertProfileRequest {
            gender: Some("   ".into()),
            goal: Some(" gain_muscle ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(req.gender, None);
        assert_eq!(req.goal.as_deref(), Some("gain_muscle"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = normalize(UpsertProfileRequest {
            age: Some(7),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("age"));

        assert!(normalize(UpsertProfileRequest {
            height_cm: Some(400.0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn unknown_enums_are_rejected() {
        assert!(normalize(UpsertProfileRequest {
            goal: Some("get_rich".into()),
            ..Default::default()
        })
        .is_err());
        assert!(normalize(UpsertProfileRequest {
            fitness_experience: Some("olympian".into()),
            ..Default::default()
        })
        .is_err());
    }
}
