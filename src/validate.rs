//! Form checks shared by several domains.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

/// Trimmed value of a required text field.
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// Trimmed optional text; blank counts as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn non_negative(field: &str, value: i32) -> AppResult<i32> {
    if value < 0 {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

pub fn in_range(field: &str, value: i32, min: i32, max: i32) -> AppResult<i32> {
    if !(min..=max).contains(&value) {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(value)
}

/// Validates `HH:MM` reminder times, dropping repeats but keeping order.
pub fn reminder_times(times: Vec<String>) -> AppResult<Vec<String>> {
    lazy_static! {
        static ref HH_MM: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
    }
    let mut out: Vec<String> = Vec::with_capacity(times.len());
    for t in times {
        let t = t.trim().to_string();
        if !HH_MM.is_match(&t) {
            return Err(AppError::validation(format!(
                "invalid reminder time '{t}', expected HH:MM"
            )));
        }
        if !out.contains(&t) {
            out.push(t);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(required("name", "").is_err());
        assert!(required("name", "  \t").is_err());
        assert_eq!(required("name", " Creatina ").unwrap(), "Creatina");
    }

    #[test]
    fn optional_drops_blank() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" 30g ".into())).as_deref(), Some("30g"));
        assert_eq!(optional(None), None);
    }

    #[test]
    fn numeric_bounds() {
        assert!(non_negative("fat", -1).is_err());
        assert_eq!(non_negative("fat", 0).unwrap(), 0);
        assert!(in_range("daily_frequency", 0, 1, 10).is_err());
        assert!(in_range("daily_frequency", 11, 1, 10).is_err());
        assert_eq!(in_range("daily_frequency", 10, 1, 10).unwrap(), 10);
    }

    #[test]
    fn reminder_times_are_validated_and_deduplicated() {
        let got = reminder_times(vec![
            "08:00".into(),
            " 20:30 ".into(),
            "08:00".into(),
        ])
        .unwrap();
        assert_eq!(got, vec!["08:00", "20:30"]);

        assert!(reminder_times(vec!["24:00".into()]).is_err());
        assert!(reminder_times(vec!["8:00".into()]).is_err());
        assert!(reminder_times(vec!["".into()]).is_err());
        assert!(reminder_times(Vec::new()).unwrap().is_empty());
    }
}
