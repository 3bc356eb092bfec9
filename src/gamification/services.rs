use serde::{Deserialize, Serialize};
use time::Date;

/// Streak lengths that unlock an achievement.
pub const MILESTONES: [i32; 3] = [7, 30, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    Overall,
    Nutrition,
    Workout,
    Water,
    Supplements,
}

impl StreakType {
    pub fn as_str(self) -> &'static str {
        match self {
            StreakType::Overall => "overall",
            StreakType::Nutrition => "nutrition",
            StreakType::Workout => "workout",
            StreakType::Water => "water",
            StreakType::Supplements => "supplements",
        }
    }

    fn label(self) -> &'static str {
        match self {
            StreakType::Overall => "geral",
            StreakType::Nutrition => "de alimentação",
            StreakType::Workout => "de treinos",
            StreakType::Water => "de hidratação",
            StreakType::Supplements => "de suplementos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current: i32,
    pub best: i32,
    pub last_active_on: Date,
}

/// Applies one day of activity to a streak.
///
/// Same day is a no-op, the next day extends the run, anything else
/// (including the very first activity) restarts it at one. Activity dated
/// before the last recorded day never rewinds the streak.
pub fn advance(prev: Option<StreakState>, day: Date) -> StreakState {
    let Some(prev) = prev else {
        return StreakState {
            current: 1,
            best: 1,
            last_active_on: day,
        };
    };

    if day <= prev.last_active_on {
        return prev;
    }

    let current = if prev.last_active_on.next_day() == Some(day) {
        prev.current + 1
    } else {
        1
    };
    StreakState {
        current,
        best: prev.best.max(current),
        last_active_on: day,
    }
}

/// Milestone crossed when a streak moved from `before` to `after`.
pub fn milestone_reached(before: i32, after: i32) -> Option<i32> {
    MILESTONES
        .iter()
        .copied()
        .find(|&m| before < m && after >= m)
}

pub fn achievement_kind(streak: StreakType, milestone: i32) -> String {
    format!("streak_{}_{}", streak.as_str(), milestone)
}

pub fn achievement_title(streak: StreakType, milestone: i32) -> String {
    format!("{milestone} dias de sequência {}", streak.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn state(current: i32, best: i32, last: Date) -> StreakState {
        StreakState {
            current,
            best,
            last_active_on: last,
        }
    }

    #[test]
    fn first_activity_starts_at_one() {
        let s = advance(None, date!(2024 - 03 - 10));
        assert_eq!(s, state(1, 1, date!(2024 - 03 - 10)));
    }

    #[test]
    fn same_day_is_a_no_op() {
        let prev = state(4, 9, date!(2024 - 03 - 10));
        assert_eq!(advance(Some(prev), date!(2024 - 03 - 10)), prev);
    }

    #[test]
    fn consecutive_day_extends_and_tracks_best() {
        let s = advance(Some(state(9, 9, date!(2024 - 02 - 29))), date!(2024 - 03 - 01));
        assert_eq!(s, state(10, 10, date!(2024 - 03 - 01)));
    }

    #[test]
    fn gap_resets_but_keeps_best() {
        let s = advance(Some(state(5, 12, date!(2024 - 03 - 10))), date!(2024 - 03 - 12));
        assert_eq!(s, state(1, 12, date!(2024 - 03 - 12)));
    }

    #[test]
    fn backdated_activity_does_not_rewind() {
        let prev = state(3, 3, date!(2024 - 03 - 10));
        assert_eq!(advance(Some(prev), date!(2024 - 03 - 01)), prev);
    }

    #[test]
    fn milestones_fire_once_when_crossed() {
        assert_eq!(milestone_reached(6, 7), Some(7));
        assert_eq!(milestone_reached(7, 7), None);
        assert_eq!(milestone_reached(7, 8), None);
        assert_eq!(milestone_reached(29, 30), Some(30));
        assert_eq!(milestone_reached(0, 1), None);
    }

    #[test]
    fn achievement_naming() {
        assert_eq!(achievement_kind(StreakType::Water, 30), "streak_water_30");
        assert_eq!(
            achievement_title(StreakType::Overall, 7),
            "7 dias de sequência geral"
        );
    }
}
