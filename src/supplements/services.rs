use crate::{
    error::{AppError, AppResult},
    validate,
};

use super::{
    dto::{CreateSupplementRequest, SupplementCard, UpdateSupplementRequest},
    repo_types::{Supplement, SupplementDraft},
};

/// Stock below this many days of doses counts as low.
pub const LOW_STOCK_DAYS: i32 = 7;
pub const MAX_DAILY_FREQUENCY: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Normal,
    Low,
    Empty,
}

impl StockStatus {
    pub fn of(remaining: i32, daily_frequency: i32) -> Self {
        if remaining <= 0 {
            StockStatus::Empty
        } else if remaining < daily_frequency.max(1) * LOW_STOCK_DAYS {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::Low => "low",
            StockStatus::Empty => "empty",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "low" => StockStatus::Low,
            "empty" => StockStatus::Empty,
            _ => StockStatus::Normal,
        }
    }
}

pub fn is_complete_today(doses_today: i64, daily_frequency: i32) -> bool {
    doses_today >= i64::from(daily_frequency)
}

pub fn stock_percentage(remaining: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    f64::from(remaining) / f64::from(total) * 100.0
}

/// Whole days the remaining capsules last at the configured frequency.
pub fn days_left(remaining: i32, daily_frequency: i32) -> i32 {
    remaining.max(0) / daily_frequency.max(1)
}

pub fn card(supplement: Supplement, doses_today: i64) -> SupplementCard {
    SupplementCard {
        doses_today,
        complete_today: is_complete_today(doses_today, supplement.daily_frequency),
        stock_percentage: stock_percentage(
            supplement.remaining_capsules,
            supplement.total_capsules,
        ),
        days_left: days_left(supplement.remaining_capsules, supplement.daily_frequency),
        supplement,
    }
}

struct CommonFields {
    name: String,
    dosage: String,
    total_capsules: i32,
    daily_frequency: i32,
    reminder_times: Vec<String>,
}

fn check_common(
    name: &str,
    dosage: &str,
    total_capsules: i32,
    daily_frequency: i32,
    reminder_times: Vec<String>,
) -> AppResult<CommonFields> {
    let name = validate::required("name", name)?;
    let dosage = validate::required("dosage", dosage)?;
    if total_capsules < 1 {
        return Err(AppError::validation("total_capsules must be at least 1"));
    }
    let daily_frequency =
        validate::in_range("daily_frequency", daily_frequency, 1, MAX_DAILY_FREQUENCY)?;
    let reminder_times = validate::reminder_times(reminder_times)?;
    Ok(CommonFields {
        name,
        dosage,
        total_capsules,
        daily_frequency,
        reminder_times,
    })
}

/// A new supplement starts with a full stock.
pub fn draft_new(req: CreateSupplementRequest) -> AppResult<SupplementDraft> {
    let c = check_common(
        &req.name,
        &req.dosage,
        req.total_capsules,
        req.daily_frequency,
        req.reminder_times,
    )?;
    Ok(SupplementDraft {
        status: StockStatus::of(c.total_capsules, c.daily_frequency).as_str(),
        remaining_capsules: c.total_capsules,
        name: c.name,
        dosage: c.dosage,
        total_capsules: c.total_capsules,
        daily_frequency: c.daily_frequency,
        reminder_times: c.reminder_times,
    })
}

/// Edits keep the current stock unless told otherwise, clamped to the new total.
pub fn draft_update(current: &Supplement, req: UpdateSupplementRequest) -> AppResult<SupplementDraft> {
    let c = check_common(
        &req.name,
        &req.dosage,
        req.total_capsules,
        req.daily_frequency,
        req.reminder_times,
    )?;
    let remaining = match req.remaining_capsules {
        Some(r) => validate::non_negative("remaining_capsules", r)?,
        None => current.remaining_capsules,
    }
    .min(c.total_capsules);

    Ok(SupplementDraft {
        status: StockStatus::of(remaining, c.daily_frequency).as_str(),
        remaining_capsules: remaining,
        name: c.name,
        dosage: c.dosage,
        total_capsules: c.total_capsules,
        daily_frequency: c.daily_frequency,
        reminder_times: c.reminder_times,
    })
}

/// Stock after one dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeOutcome {
    pub remaining: i32,
    pub status: StockStatus,
    /// Set when the dose pushed the stock into a worse status.
    pub alert: Option<StockStatus>,
}

pub fn plan_take(s: &Supplement, doses_today: i64) -> AppResult<TakeOutcome> {
    if s.remaining_capsules <= 0 {
        return Err(AppError::conflict(format!("{} is out of stock", s.name)));
    }
    if is_complete_today(doses_today, s.daily_frequency) {
        return Err(AppError::conflict(format!(
            "all {} doses of {} were already taken today",
            s.daily_frequency, s.name
        )));
    }

    let remaining = s.remaining_capsules - 1;
    let status = StockStatus::of(remaining, s.daily_frequency);
    let alert = (status != StockStatus::parse(&s.status) && status != StockStatus::Normal)
        .then_some(status);
    Ok(TakeOutcome {
        remaining,
        status,
        alert,
    })
}

/// `(remaining, total, status)` after adding capsules.
pub fn plan_refill(s: &Supplement, capsules: i32) -> AppResult<(i32, i32, StockStatus)> {
    if capsules < 1 {
        return Err(AppError::validation("capsules must be at least 1"));
    }
    let remaining = s
        .remaining_capsules
        .checked_add(capsules)
        .ok_or_else(|| AppError::validation("capsules is too large"))?;
    let total = s.total_capsules.max(remaining);
    Ok((remaining, total, StockStatus::of(remaining, s.daily_frequency)))
}

pub fn alert_message(name: &str, status: StockStatus, remaining: i32) -> (String, String) {
    match status {
        StockStatus::Empty => (
            "Suplemento acabou".to_string(),
            format!("Seu estoque de {name} acabou. Hora de repor!"),
        ),
        _ => (
            "Estoque baixo".to_string(),
            format!("Restam apenas {remaining} cápsulas de {name}."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn supplement(total: i32, remaining: i32, freq: i32) -> Supplement {
        Supplement {
            id: Uuid::new_v4(),
            name: "Creatina".into(),
            dosage: "5g".into(),
            total_capsules: total,
            remaining_capsules: remaining,
            daily_frequency: freq,
            reminder_times: vec![],
            status: StockStatus::of(remaining, freq).as_str().into(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn create(name: &str, dosage: &str, total: i32, freq: i32) -> CreateSupplementRequest {
        CreateSupplementRequest {
            name: name.into(),
            dosage: dosage.into(),
            total_capsules: total,
            daily_frequency: freq,
            reminder_times: vec![],
        }
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(StockStatus::of(0, 2), StockStatus::Empty);
        assert_eq!(StockStatus::of(13, 2), StockStatus::Low);
        assert_eq!(StockStatus::of(14, 2), StockStatus::Normal);
        assert_eq!(StockStatus::of(6, 1), StockStatus::Low);
        assert_eq!(StockStatus::of(60, 1), StockStatus::Normal);
    }

    #[test]
    fn completion_and_percentages() {
        assert!(!is_complete_today(1, 2));
        assert!(is_complete_today(2, 2));
        assert!(is_complete_today(3, 2));
        assert_eq!(stock_percentage(30, 60), 50.0);
        assert_eq!(stock_percentage(0, 0), 0.0);
        assert_eq!(days_left(9, 2), 4);
    }

    #[test]
    fn create_requires_name_and_dosage() {
        let err = draft_new(create("", "5g", 60, 1)).unwrap_err();
        assert!(err.to_string().contains("name"));
        let err = draft_new(create("Creatina", "  ", 60, 1)).unwrap_err();
        assert!(err.to_string().contains("dosage"));
    }

    #[test]
    fn create_checks_counts() {
        assert!(draft_new(create("Ômega 3", "1000mg", 0, 1)).is_err());
        assert!(draft_new(create("Ômega 3", "1000mg", 60, 0)).is_err());
        assert!(draft_new(create("Ômega 3", "1000mg", 60, 11)).is_err());
    }

    #[test]
    fn create_starts_full() {
        let d = draft_new(create(" Whey ", "30g", 60, 2)).unwrap();
        assert_eq!(d.name, "Whey");
        assert_eq!(d.remaining_capsules, 60);
        assert_eq!(d.status, "normal");

        let small = draft_new(create("Whey", "30g", 5, 1)).unwrap();
        assert_eq!(small.status, "low");
    }

    #[test]
    fn update_clamps_remaining_to_total() {
        let current = supplement(60, 50, 1);
        let d = draft_update(
            &current,
            UpdateSupplementRequest {
                name: "Creatina".into(),
                dosage: "5g".into(),
                total_capsules: 30,
                remaining_capsules: None,
                daily_frequency: 1,
                reminder_times: vec!["08:00".into()],
            },
        )
        .unwrap();
        assert_eq!(d.total_capsules, 30);
        assert_eq!(d.remaining_capsules, 30);
    }

    #[test]
    fn take_decrements_by_exactly_one() {
        let s = supplement(60, 60, 2);
        let out = plan_take(&s, 0).unwrap();
        assert_eq!(out.remaining, 59);
        assert_eq!(out.status, StockStatus::Normal);
        assert_eq!(out.alert, None);
    }

    #[test]
    fn take_refuses_when_empty() {
        let s = supplement(60, 0, 1);
        assert!(matches!(plan_take(&s, 0), Err(AppError::Conflict(_))));
    }

    #[test]
    fn take_refuses_after_daily_dose_is_complete() {
        let s = supplement(60, 40, 2);
        assert!(plan_take(&s, 1).is_ok());
        assert!(matches!(plan_take(&s, 2), Err(AppError::Conflict(_))));
    }

    #[test]
    fn take_alerts_on_status_drop_only_once() {
        let s = supplement(60, 7, 1);
        let out = plan_take(&s, 0).unwrap();
        assert_eq!(out.status, StockStatus::Low);
        assert_eq!(out.alert, Some(StockStatus::Low));

        let s = supplement(60, 6, 1);
        assert_eq!(plan_take(&s, 0).unwrap().alert, None);

        let s = supplement(60, 1, 1);
        let out = plan_take(&s, 0).unwrap();
        assert_eq!(out.remaining, 0);
        assert_eq!(out.alert, Some(StockStatus::Empty));
    }

    #[test]
    fn refill_grows_total_when_needed() {
        let s = supplement(60, 10, 1);
        assert_eq!(plan_refill(&s, 30).unwrap(), (40, 60, StockStatus::Normal));
        assert_eq!(plan_refill(&s, 90).unwrap(), (100, 100, StockStatus::Normal));
        assert!(plan_refill(&s, 0).is_err());
    }

    #[test]
    fn card_reports_daily_progress() {
        let c = card(supplement(60, 30, 2), 2);
        assert!(c.complete_today);
        assert_eq!(c.stock_percentage, 50.0);
        assert_eq!(c.days_left, 15);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["name"], "Creatina");
        assert_eq!(json["doses_today"], 2);
    }
}
