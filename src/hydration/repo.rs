use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::WaterLog;

pub async fn insert(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: Date,
    amount_ml: i32,
) -> anyhow::Result<WaterLog> {
    sqlx::query_as::<_, WaterLog>(
        r#"
        INSERT INTO water_logs (user_id, date, amount_ml)
        VALUES ($1, $2, $3)
        RETURNING id, date, amount_ml, created_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(amount_ml)
    .fetch_one(conn)
    .await
    .context("insert water log")
}

pub async fn list_for_day(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Vec<WaterLog>> {
    sqlx::query_as::<_, WaterLog>(
        r#"
        SELECT id, date, amount_ml, created_at
        FROM water_logs
        WHERE user_id = $1 AND date = $2
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("list water logs")
}
