use time::Date;

use crate::{
    error::{AppError, AppResult},
    validate,
};

use super::{
    dto::{FoodRequest, GoalsRequest},
    repo_types::{DailyGoals, FavoriteMeal, Meal},
};

pub const DEFAULT_CALORIES: i32 = 2000;
pub const DEFAULT_CARBS: i32 = 200;
pub const DEFAULT_PROTEIN: i32 = 150;
pub const DEFAULT_FAT: i32 = 60;
pub const DEFAULT_WATER_ML: i32 = 2000;

pub const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack"];

impl DailyGoals {
    /// Default targets with nothing consumed yet.
    pub fn defaults(date: Date) -> Self {
        Self {
            date,
            calories_target: DEFAULT_CALORIES,
            calories_consumed: 0,
            carbs_target: DEFAULT_CARBS,
            carbs_consumed: 0,
            protein_target: DEFAULT_PROTEIN,
            protein_consumed: 0,
            fat_target: DEFAULT_FAT,
            fat_consumed: 0,
            water_target: DEFAULT_WATER_ML,
            water_consumed: 0,
        }
    }
}

/// Amounts added to (or, negated, removed from) a day's consumed totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intake {
    pub calories: i32,
    pub carbs: i32,
    pub protein: i32,
    pub fat: i32,
    pub water_ml: i32,
}

impl Intake {
    pub fn water(ml: i32) -> Self {
        Self {
            water_ml: ml,
            ..Default::default()
        }
    }

    pub fn negate(self) -> Self {
        Self {
            calories: -self.calories,
            carbs: -self.carbs,
            protein: -self.protein,
            fat: -self.fat,
            water_ml: -self.water_ml,
        }
    }
}

impl From<&Meal> for Intake {
    fn from(m: &Meal) -> Self {
        Self {
            calories: m.calories,
            carbs: m.carbs,
            protein: m.protein,
            fat: m.fat,
            water_ml: 0,
        }
    }
}

/// Applies `delta` to the consumed totals; totals never drop below zero.
pub fn apply_intake(goals: &mut DailyGoals, delta: Intake) {
    fn add(total: &mut i32, d: i32) {
        *total = total.saturating_add(d).max(0);
    }
    add(&mut goals.calories_consumed, delta.calories);
    add(&mut goals.carbs_consumed, delta.carbs);
    add(&mut goals.protein_consumed, delta.protein);
    add(&mut goals.fat_consumed, delta.fat);
    add(&mut goals.water_consumed, delta.water_ml);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub calories: i32,
    pub carbs: i32,
    pub protein: i32,
    pub fat: i32,
    pub water_ml: i32,
}

pub fn targets(req: &GoalsRequest) -> AppResult<Targets> {
    Ok(Targets {
        calories: validate::non_negative("calories_target", req.calories_target)?,
        carbs: validate::non_negative("carbs_target", req.carbs_target)?,
        protein: validate::non_negative("protein_target", req.protein_target)?,
        fat: validate::non_negative("fat_target", req.fat_target)?,
        water_ml: validate::non_negative("water_target", req.water_target)?,
    })
}

/// A validated food entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub food_name: String,
    pub calories: i32,
    pub carbs: i32,
    pub protein: i32,
    pub fat: i32,
    pub serving_size: Option<String>,
}

impl Food {
    pub fn intake(&self) -> Intake {
        Intake {
            calories: self.calories,
            carbs: self.carbs,
            protein: self.protein,
            fat: self.fat,
            water_ml: 0,
        }
    }
}

impl From<&FavoriteMeal> for Food {
    fn from(f: &FavoriteMeal) -> Self {
        Self {
            food_name: f.food_name.clone(),
            calories: f.calories,
            carbs: f.carbs,
            protein: f.protein,
            fat: f.fat,
            serving_size: f.serving_size.clone(),
        }
    }
}

pub fn food(req: FoodRequest) -> AppResult<Food> {
    Ok(Food {
        food_name: validate::required("food_name", &req.food_name)?,
        calories: validate::non_negative("calories", req.calories)?,
        carbs: validate::non_negative("carbs", req.carbs)?,
        protein: validate::non_negative("protein", req.protein)?,
        fat: validate::non_negative("fat", req.fat)?,
        serving_size: validate::optional(req.serving_size),
    })
}

pub fn meal_type(value: &str) -> AppResult<&'static str> {
    let v = value.trim();
    MEAL_TYPES
        .iter()
        .copied()
        .find(|t| *t == v)
        .ok_or_else(|| {
            AppError::validation(format!(
                "meal_type must be one of {}",
                MEAL_TYPES.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn food_req(name: &str, kcal: i32) -> FoodRequest {
        FoodRequest {
            food_name: name.into(),
            calories: kcal,
            carbs: 30,
            protein: 20,
            fat: 5,
            serving_size: Some(" ".into()),
        }
    }

    #[test]
    fn defaults_have_no_consumption() {
        let g = DailyGoals::defaults(date!(2024 - 01 - 01));
        assert_eq!(g.calories_target, 2000);
        assert_eq!(g.carbs_target, 200);
        assert_eq!(g.protein_target, 150);
        assert_eq!(g.fat_target, 60);
        assert_eq!(g.water_target, 2000);
        assert_eq!(g.calories_consumed + g.water_consumed, 0);
    }

    #[test]
    fn food_requires_name() {
        let err = food(food_req("  ", 100)).unwrap_err();
        assert!(err.to_string().contains("food_name"));
    }

    #[test]
    fn food_rejects_negative_macros() {
        assert!(food(food_req("Arroz", -1)).is_err());
        let f = food(food_req(" Arroz ", 0)).unwrap();
        assert_eq!(f.food_name, "Arroz");
        assert_eq!(f.serving_size, None);
    }

    #[test]
    fn meal_types() {
        assert_eq!(meal_type("lunch").unwrap(), "lunch");
        assert_eq!(meal_type(" snack ").unwrap(), "snack");
        assert!(meal_type("brunch").is_err());
        assert!(meal_type("").is_err());
    }

    #[test]
    fn targets_must_not_be_negative() {
        let mut req = GoalsRequest {
            date: None,
            calories_target: 1800,
            carbs_target: 180,
            protein_target: 140,
            fat_target: 50,
            water_target: 2500,
        };
        assert_eq!(targets(&req).unwrap().water_ml, 2500);
        req.fat_target = -5;
        assert!(targets(&req).is_err());
    }

    #[test]
    fn removing_intake_never_goes_below_zero() {
        let mut g = DailyGoals::defaults(date!(2024 - 01 - 01));
        let f = food(food_req("Frango", 300)).unwrap();
        apply_intake(&mut g, f.intake());
        assert_eq!(g.calories_consumed, 300);
        assert_eq!(g.protein_consumed, 20);

        g.calories_consumed = 100;
        apply_intake(&mut g, f.intake().negate());
        assert_eq!(g.calories_consumed, 0);
        assert_eq!(g.protein_consumed, 0);
    }

    #[test]
    fn water_intake_only_touches_water() {
        let mut g = DailyGoals::defaults(date!(2024 - 01 - 01));
        apply_intake(&mut g, Intake::water(250));
        assert_eq!(g.water_consumed, 250);
        assert_eq!(g.calories_consumed, 0);
    }
}
