use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::{
    repo_types::{DailyGoals, FavoriteMeal, Meal},
    services::{apply_intake, Food, Intake, Targets},
};

const GOAL_COLUMNS: &str = "date, calories_target, calories_consumed, carbs_target, \
                            carbs_consumed, protein_target, protein_consumed, fat_target, \
                            fat_consumed, water_target, water_consumed";

const MEAL_COLUMNS: &str =
    "id, date, meal_type, food_name, calories, carbs, protein, fat, serving_size, created_at";

const FAVORITE_COLUMNS: &str = "id, food_name, calories, carbs, protein, fat, serving_size, \
                                times_used, last_used_at, created_at";

pub async fn goals_for_day(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
) -> anyhow::Result<Option<DailyGoals>> {
    sqlx::query_as::<_, DailyGoals>(&format!(
        "SELECT {GOAL_COLUMNS} FROM daily_goals WHERE user_id = $1 AND date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(conn)
    .await
    .context("select daily goals")
}

pub async fn upsert_targets(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    t: &Targets,
) -> anyhow::Result<DailyGoals> {
    sqlx::query_as::<_, DailyGoals>(&format!(
        r#"
        INSERT INTO daily_goals
            (user_id, date, calories_target, carbs_target, protein_target, fat_target, water_target)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, date) DO UPDATE SET
            calories_target = EXCLUDED.calories_target,
            carbs_target = EXCLUDED.carbs_target,
            protein_target = EXCLUDED.protein_target,
            fat_target = EXCLUDED.fat_target,
            water_target = EXCLUDED.water_target,
            updated_at = now()
        RETURNING {GOAL_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .bind(t.calories)
    .bind(t.carbs)
    .bind(t.protein)
    .bind(t.fat)
    .bind(t.water_ml)
    .fetch_one(db)
    .await
    .context("upsert daily goals")
}

/// Adds `delta` to the day's consumed totals, creating the row with default
/// targets on first use.
pub async fn add_intake(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    delta: Intake,
) -> anyhow::Result<DailyGoals> {
    sqlx::query("INSERT INTO daily_goals (user_id, date) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(date)
        .execute(&mut *conn)
        .await
        .context("ensure daily goals")?;

    let mut goals = sqlx::query_as::<_, DailyGoals>(&format!(
        "SELECT {GOAL_COLUMNS} FROM daily_goals WHERE user_id = $1 AND date = $2 FOR UPDATE"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_one(&mut *conn)
    .await
    .context("lock daily goals")?;

    apply_intake(&mut goals, delta);

    sqlx::query(
        r#"
        UPDATE daily_goals SET
            calories_consumed = $3,
            carbs_consumed = $4,
            protein_consumed = $5,
            fat_consumed = $6,
            water_consumed = $7,
            updated_at = now()
        WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(goals.calories_consumed)
    .bind(goals.carbs_consumed)
    .bind(goals.protein_consumed)
    .bind(goals.fat_consumed)
    .bind(goals.water_consumed)
    .execute(conn)
    .await
    .context("update consumed totals")?;

    Ok(goals)
}

pub async fn insert_meal(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    meal_type: &str,
    f: &Food,
) -> anyhow::Result<Meal> {
    sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals
            (user_id, date, meal_type, food_name, calories, carbs, protein, fat, serving_size)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .bind(meal_type)
    .bind(&f.food_name)
    .bind(f.calories)
    .bind(f.carbs)
    .bind(f.protein)
    .bind(f.fat)
    .bind(&f.serving_size)
    .fetch_one(conn)
    .await
    .context("insert meal")
}

pub async fn list_meals(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Vec<Meal>> {
    sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE user_id = $1 AND date = $2 ORDER BY created_at"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("list meals")
}

/// Deletes and returns the meal so its macros can be taken back out.
pub async fn delete_meal(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<Meal>> {
    sqlx::query_as::<_, Meal>(&format!(
        "DELETE FROM meals WHERE id = $1 AND user_id = $2 RETURNING {MEAL_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("delete meal")
}

pub async fn list_favorites(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FavoriteMeal>> {
    sqlx::query_as::<_, FavoriteMeal>(&format!(
        r#"
        SELECT {FAVORITE_COLUMNS}
        FROM favorite_meals
        WHERE user_id = $1
        ORDER BY times_used DESC, created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list favorite meals")
}

pub async fn insert_favorite(db: &PgPool, user_id: Uuid, f: &Food) -> anyhow::Result<FavoriteMeal> {
    sqlx::query_as::<_, FavoriteMeal>(&format!(
        r#"
        INSERT INTO favorite_meals (user_id, food_name, calories, carbs, protein, fat, serving_size)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {FAVORITE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&f.food_name)
    .bind(f.calories)
    .bind(f.carbs)
    .bind(f.protein)
    .bind(f.fat)
    .bind(&f.serving_size)
    .fetch_one(db)
    .await
    .context("insert favorite meal")
}

pub async fn delete_favorite(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM favorite_meals WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete favorite meal")?;
    Ok(res.rows_affected() == 1)
}

/// Bumps the usage counters and returns the favourite.
pub async fn use_favorite(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<FavoriteMeal>> {
    sqlx::query_as::<_, FavoriteMeal>(&format!(
        r#"
        UPDATE favorite_meals
        SET times_used = times_used + 1, last_used_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING {FAVORITE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("use favorite meal")
}
