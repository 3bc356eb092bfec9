//! Calendar-day helpers shared by the per-day logs.

use serde::Deserialize;
use time::{Date, OffsetDateTime, Time};

time::serde::format_description!(pub iso_day, Date, "[year]-[month]-[day]");

/// `?date=YYYY-MM-DD`, defaulting to today (UTC).
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    #[serde(default, with = "iso_day::option")]
    pub date: Option<Date>,
}

impl DayQuery {
    pub fn day(&self) -> Date {
        self.date.unwrap_or_else(today)
    }
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Half-open `[start, end)` UTC bounds of a calendar day.
pub fn bounds(day: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = day.with_time(Time::MIDNIGHT).assume_utc();
    (start, start + time::Duration::DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn bounds_cover_one_whole_day() {
        let (start, end) = bounds(date!(2024 - 02 - 29));
        assert_eq!(start, datetime!(2024-02-29 0:00 UTC));
        assert_eq!(end, datetime!(2024-03-01 0:00 UTC));
    }

    #[test]
    fn day_query_parses_iso_dates() {
        let q: DayQuery = serde_json::from_str(r#"{"date":"2024-05-01"}"#).unwrap();
        assert_eq!(q.day(), date!(2024 - 05 - 01));
    }

    #[test]
    fn day_query_defaults_to_today() {
        let q: DayQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.day(), today());
    }

    #[test]
    fn day_query_rejects_garbage() {
        assert!(serde_json::from_str::<DayQuery>(r#"{"date":"yesterday"}"#).is_err());
    }
}
