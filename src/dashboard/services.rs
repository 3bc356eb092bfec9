use time::OffsetDateTime;

use crate::{
    fasting::{repo_types::FastingSession, services as fasting},
    nutrition::repo_types::DailyGoals,
};

use super::dto::DashboardStats;

/// Everything the dashboard reads, gathered from the other domains.
#[derive(Debug)]
pub struct Snapshot {
    pub goals: DailyGoals,
    pub active_fast: Option<FastingSession>,
    pub workouts: i64,
    pub supplement_doses_due: i64,
    pub supplement_doses_taken: i64,
    pub overall_streak: i32,
}

pub fn stats(s: Snapshot, now: OffsetDateTime) -> DashboardStats {
    let (fasting_hours, fasting_goal_hours) = match &s.active_fast {
        Some(f) => (fasting::elapsed_hours(f.start_time, now), f.target_hours),
        None => (0.0, fasting::DEFAULT_GOAL_HOURS),
    };
    let g = s.goals;
    DashboardStats {
        date: g.date,
        calories: g.calories_consumed,
        calories_goal: g.calories_target,
        protein: g.protein_consumed,
        protein_goal: g.protein_target,
        carbs: g.carbs_consumed,
        carbs_goal: g.carbs_target,
        fats: g.fat_consumed,
        fats_goal: g.fat_target,
        water_ml: g.water_consumed,
        water_goal_ml: g.water_target,
        fasting_hours,
        fasting_goal_hours,
        workouts_today: s.workouts,
        supplements_taken: s.supplement_doses_taken,
        supplements_total: s.supplement_doses_due,
        current_streak: s.overall_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{
        macros::{date, datetime},
        Duration,
    };
    use uuid::Uuid;

    fn snapshot(active_fast: Option<FastingSession>) -> Snapshot {
        let mut goals = DailyGoals::defaults(date!(2024 - 05 - 01));
        goals.calories_consumed = 1250;
        goals.water_consumed = 750;
        Snapshot {
            goals,
            active_fast,
            workouts: 2,
            supplement_doses_due: 3,
            supplement_doses_taken: 1,
            overall_streak: 5,
        }
    }

    #[test]
    fn empty_day_uses_default_goals() {
        let s = stats(snapshot(None), OffsetDateTime::now_utc());
        assert_eq!(s.calories, 1250);
        assert_eq!(s.calories_goal, 2000);
        assert_eq!(s.fats_goal, 60);
        assert_eq!(s.water_ml, 750);
        assert_eq!(s.water_goal_ml, 2000);
        assert_eq!(s.fasting_hours, 0.0);
        assert_eq!(s.fasting_goal_hours, 16);
        assert_eq!(s.supplements_total, 3);
        assert_eq!(s.current_streak, 5);
    }

    #[test]
    fn active_fast_drives_fasting_fields() {
        let start = datetime!(2024-05-01 20:00 UTC);
        let fast = FastingSession {
            id: Uuid::new_v4(),
            plan_type: "18:6".into(),
            target_hours: 18,
            start_time: start,
            end_time: None,
            completed: false,
        };
        let s = stats(snapshot(Some(fast)), start + Duration::minutes(200));
        assert_eq!(s.fasting_hours, 3.3);
        assert_eq!(s.fasting_goal_hours, 18);
    }

    #[test]
    fn serializes_dashboard_field_names() {
        let json = serde_json::to_value(stats(snapshot(None), OffsetDateTime::now_utc())).unwrap();
        for key in [
            "calories",
            "calories_goal",
            "protein_goal",
            "fats",
            "water_goal_ml",
            "fasting_goal_hours",
            "workouts_today",
            "supplements_taken",
            "supplements_total",
            "current_streak",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["date"], "2024-05-01");
    }
}
