use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::{
    repo_types::{Exercise, WorkoutLog},
    services::WorkoutDraft,
};

pub async fn list_exercises(
    db: &PgPool,
    category: Option<&str>,
    muscle_group: Option<&str>,
) -> anyhow::Result<Vec<Exercise>> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, name, category, muscle_group, equipment, difficulty, instructions, video_url
        FROM exercises
        WHERE ($1::TEXT IS NULL OR lower(category) = $1)
          AND ($2::TEXT IS NULL OR lower(muscle_group) = $2)
        ORDER BY category, name
        "#,
    )
    .bind(category)
    .bind(muscle_group)
    .fetch_all(db)
    .await
    .context("list exercises")
}

pub async fn exercise_exists(conn: &mut PgConnection, id: Uuid) -> anyhow::Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM exercises WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
        .context("check exercise")
}

pub async fn insert_log(
    conn: &mut PgConnection,
    user_id: Uuid,
    d: &WorkoutDraft,
) -> anyhow::Result<WorkoutLog> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        WITH inserted AS (
            INSERT INTO workout_logs
                (user_id, exercise_id, date, sets, reps, weight_kg, duration_minutes, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        )
        SELECT i.id, i.exercise_id, e.name AS exercise_name, i.date, i.sets, i.reps,
               i.weight_kg, i.duration_minutes, i.notes, i.created_at
        FROM inserted i
        LEFT JOIN exercises e ON e.id = i.exercise_id
        "#,
    )
    .bind(user_id)
    .bind(d.exercise_id)
    .bind(d.date)
    .bind(d.sets)
    .bind(d.reps)
    .bind(d.weight_kg)
    .bind(d.duration_minutes)
    .bind(&d.notes)
    .fetch_one(conn)
    .await
    .context("insert workout log")
}

pub async fn list_logs(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Vec<WorkoutLog>> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT w.id, w.exercise_id, e.name AS exercise_name, w.date, w.sets, w.reps,
               w.weight_kg, w.duration_minutes, w.notes, w.created_at
        FROM workout_logs w
        LEFT JOIN exercises e ON e.id = w.exercise_id
        WHERE w.user_id = $1 AND w.date = $2
        ORDER BY w.created_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("list workout logs")
}

pub async fn count_for_day(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM workout_logs WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(db)
    .await
    .context("count workout logs")
}

pub async fn delete_log(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM workout_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete workout log")?;
    Ok(res.rows_affected() == 1)
}
