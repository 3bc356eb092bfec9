use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::FastingSession;

const COLUMNS: &str = "id, plan_type, target_hours, start_time, end_time, completed";

pub async fn active(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<FastingSession>> {
    sqlx::query_as::<_, FastingSession>(&format!(
        "SELECT {COLUMNS} FROM fasting_sessions WHERE user_id = $1 AND end_time IS NULL"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("select active fast")
}

/// `None` when the user already has a fast running.
pub async fn start(
    db: &PgPool,
    user_id: Uuid,
    plan_type: &str,
    target_hours: i32,
    at: OffsetDateTime,
) -> anyhow::Result<Option<FastingSession>> {
    sqlx::query_as::<_, FastingSession>(&format!(
        r#"
        INSERT INTO fasting_sessions (user_id, plan_type, target_hours, start_time)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) WHERE end_time IS NULL DO NOTHING
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(plan_type)
    .bind(target_hours)
    .bind(at)
    .fetch_optional(db)
    .await
    .context("start fast")
}

pub async fn lock_active(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> anyhow::Result<Option<FastingSession>> {
    sqlx::query_as::<_, FastingSession>(&format!(
        "SELECT {COLUMNS} FROM fasting_sessions WHERE user_id = $1 AND end_time IS NULL FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("lock active fast")
}

pub async fn finish(
    conn: &mut PgConnection,
    id: Uuid,
    end_time: OffsetDateTime,
    completed: bool,
) -> anyhow::Result<FastingSession> {
    sqlx::query_as::<_, FastingSession>(&format!(
        r#"
        UPDATE fasting_sessions SET end_time = $2, completed = $3
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(end_time)
    .bind(completed)
    .fetch_one(conn)
    .await
    .context("finish fast")
}

pub async fn history(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FastingSession>> {
    sqlx::query_as::<_, FastingSession>(&format!(
        r#"
        SELECT {COLUMNS} FROM fasting_sessions
        WHERE user_id = $1
        ORDER BY start_time DESC
        LIMIT 100
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list fasting history")
}
