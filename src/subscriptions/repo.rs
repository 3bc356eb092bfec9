use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo_types::Subscription,
    services::{Plan, Status},
};

const COLUMNS: &str = "id, plan, status, start_date, end_date, created_at";

/// The active row, locked until the surrounding transaction ends.
pub async fn lock_active(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> anyhow::Result<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 AND status = 'active' FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("lock active subscription")
}

pub async fn had_trial(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM subscriptions WHERE user_id = $1 AND plan = 'trial')",
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
    .context("check previous trial")
}

pub async fn open(
    conn: &mut PgConnection,
    user_id: Uuid,
    plan: Plan,
    start: OffsetDateTime,
    end: Option<OffsetDateTime>,
) -> anyhow::Result<Subscription> {
    sqlx::query_as::<_, Subscription>(&format!(
        r#"
        INSERT INTO subscriptions (user_id, plan, status, start_date, end_date)
        VALUES ($1, $2, 'active', $3, $4)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(plan.as_str())
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await
    .context("insert subscription")
}

/// Moves an active row to `status`, ending it at `end`.
pub async fn close(
    conn: &mut PgConnection,
    id: Uuid,
    status: Status,
    end: OffsetDateTime,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE subscriptions SET status = $2, end_date = $3 WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .bind(end)
        .execute(conn)
        .await
        .context("close subscription")?;
    Ok(())
}

pub async fn history(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Subscription>> {
    sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list subscriptions")
}
