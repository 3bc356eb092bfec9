use time::{Duration, OffsetDateTime};

use crate::error::{AppError, AppResult};

use super::{dto::PlanView, repo_types::Subscription};

pub const TRIAL_DAYS: i64 = 7;
pub const WEEKLY_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Free,
    Trial,
    Weekly,
    Lifetime,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Trial => "trial",
            Plan::Weekly => "weekly",
            Plan::Lifetime => "lifetime",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "trial" => Ok(Plan::Trial),
            "weekly" => Ok(Plan::Weekly),
            "lifetime" => Ok(Plan::Lifetime),
            other => Err(AppError::validation(format!(
                "plan must be one of free, trial, weekly, lifetime (got '{other}')"
            ))),
        }
    }

    /// Every paid or trial plan unlocks pro features.
    pub fn is_pro(self) -> bool {
        self != Plan::Free
    }

    /// Length of one period; `None` never runs out.
    pub fn period(self) -> Option<Duration> {
        match self {
            Plan::Trial => Some(Duration::days(TRIAL_DAYS)),
            Plan::Weekly => Some(Duration::days(WEEKLY_DAYS)),
            Plan::Free | Plan::Lifetime => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Cancelled,
    Expired,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Cancelled => "cancelled",
            Status::Expired => "expired",
        }
    }
}

/// An active row whose end date has passed.
pub fn has_lapsed(sub: &Subscription, now: OffsetDateTime) -> bool {
    sub.status == Status::Active.as_str() && sub.end_date.is_some_and(|end| end <= now)
}

/// New row for a plan switch: starts now, ends after one period.
pub fn open(plan: Plan, now: OffsetDateTime) -> (OffsetDateTime, Option<OffsetDateTime>) {
    (now, plan.period().map(|p| now + p))
}

/// The trial is offered once per account.
pub fn check_switch(plan: Plan, had_trial: bool) -> AppResult<()> {
    if plan == Plan::Trial && had_trial {
        return Err(AppError::conflict("The free trial was already used"));
    }
    Ok(())
}

pub fn view(active: Option<&Subscription>) -> PlanView {
    match active {
        Some(sub) => {
            let plan = Plan::parse(&sub.plan).unwrap_or(Plan::Free);
            PlanView {
                plan: plan.as_str(),
                status: Status::Active.as_str(),
                is_pro: plan.is_pro(),
                start_date: Some(sub.start_date),
                end_date: sub.end_date,
            }
        }
        None => PlanView {
            plan: Plan::Free.as_str(),
            status: Status::Active.as_str(),
            is_pro: false,
            start_date: None,
            end_date: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn sub(plan: &str, status: &str, end: Option<OffsetDateTime>) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            plan: plan.into(),
            status: status.into(),
            start_date: datetime!(2024-05-01 10:00 UTC),
            end_date: end,
            created_at: datetime!(2024-05-01 10:00 UTC),
        }
    }

    #[test]
    fn plans_parse_loosely_and_reject_unknowns() {
        assert_eq!(Plan::parse(" Weekly ").unwrap(), Plan::Weekly);
        assert_eq!(Plan::parse("lifetime").unwrap(), Plan::Lifetime);
        assert!(Plan::parse("monthly").is_err());
        assert!(Plan::parse("").is_err());
    }

    #[test]
    fn only_free_is_not_pro() {
        assert!(!Plan::Free.is_pro());
        assert!(Plan::Trial.is_pro());
        assert!(Plan::Weekly.is_pro());
        assert!(Plan::Lifetime.is_pro());
    }

    #[test]
    fn periods_set_the_end_date() {
        let now = datetime!(2024-05-01 10:00 UTC);
        assert_eq!(open(Plan::Trial, now), (now, Some(datetime!(2024-05-08 10:00 UTC))));
        assert_eq!(open(Plan::Weekly, now).1, Some(datetime!(2024-05-08 10:00 UTC)));
        assert_eq!(open(Plan::Lifetime, now).1, None);
        assert_eq!(open(Plan::Free, now).1, None);
    }

    #[test]
    fn lapse_needs_an_active_row_past_its_end() {
        let end = datetime!(2024-05-08 10:00 UTC);
        let before = datetime!(2024-05-08 09:59 UTC);
        assert!(!has_lapsed(&sub("weekly", "active", Some(end)), before));
        assert!(has_lapsed(&sub("weekly", "active", Some(end)), end));
        assert!(!has_lapsed(&sub("weekly", "cancelled", Some(end)), end));
        assert!(!has_lapsed(&sub("lifetime", "active", None), end));
    }

    #[test]
    fn trial_is_offered_once() {
        assert!(check_switch(Plan::Trial, false).is_ok());
        assert!(check_switch(Plan::Trial, true).is_err());
        assert!(check_switch(Plan::Weekly, true).is_ok());
    }

    #[test]
    fn no_row_reads_as_free() {
        let v = view(None);
        assert_eq!(v.plan, "free");
        assert_eq!(v.status, "active");
        assert!(!v.is_pro);

        let v = view(Some(&sub("lifetime", "active", None)));
        assert_eq!(v.plan, "lifetime");
        assert!(v.is_pro);
        assert_eq!(v.end_date, None);
    }
}
