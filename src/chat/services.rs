use crate::{
    error::{AppError, AppResult},
    validate,
};

pub const ROLES: &[&str] = &["user", "assistant"];
pub const MAX_MESSAGE_CHARS: usize = 4000;
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

pub fn role(value: &str) -> AppResult<&'static str> {
    let v = value.trim().to_lowercase();
    ROLES
        .iter()
        .copied()
        .find(|r| *r == v)
        .ok_or_else(|| AppError::validation(format!("role must be user or assistant (got '{v}')")))
}

pub fn message(value: &str) -> AppResult<String> {
    let m = validate::required("message", value)?;
    if m.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(m)
}

/// Page size for the history, defaulting to the latest 50.
pub fn limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}
