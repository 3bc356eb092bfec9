use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::repo_types::{Notification, NotificationKind, NotificationSettings};

pub async fn list(db: &PgPool, user_id: Uuid, unread_only: bool) -> anyhow::Result<Vec<Notification>> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, title, message, kind, read, created_at
        FROM notifications
        WHERE user_id = $1 AND (NOT $2 OR read = FALSE)
        ORDER BY created_at DESC
        LIMIT 200
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(db)
    .await
    .context("list notifications")
}

/// Returns false when no such notification belongs to the user.
pub async fn mark_read(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("mark notification read")?;
    Ok(res.rows_affected() == 1)
}

pub async fn mark_all_read(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let res = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
        .bind(user_id)
        .execute(db)
        .await
        .context("mark all notifications read")?;
    Ok(res.rows_affected())
}

/// Settings of a user, defaults when never saved.
pub async fn settings(conn: &mut PgConnection, user_id: Uuid) -> anyhow::Result<NotificationSettings> {
    let row = sqlx::query_as::<_, NotificationSettings>(
        r#"
        SELECT water_enabled, supplement_enabled, workout_enabled, reminder_times
        FROM notification_settings
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("select notification settings")?;
    Ok(row.unwrap_or_default())
}

pub async fn save_settings(
    db: &PgPool,
    user_id: Uuid,
    s: &NotificationSettings,
) -> anyhow::Result<NotificationSettings> {
    sqlx::query_as::<_, NotificationSettings>(
        r#"
        INSERT INTO notification_settings
            (user_id, water_enabled, supplement_enabled, workout_enabled, reminder_times)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            water_enabled = EXCLUDED.water_enabled,
            supplement_enabled = EXCLUDED.supplement_enabled,
            workout_enabled = EXCLUDED.workout_enabled,
            reminder_times = EXCLUDED.reminder_times,
            updated_at = now()
        RETURNING water_enabled, supplement_enabled, workout_enabled, reminder_times
        "#,
    )
    .bind(user_id)
    .bind(s.water_enabled)
    .bind(s.supplement_enabled)
    .bind(s.workout_enabled)
    .bind(&s.reminder_times)
    .fetch_one(db)
    .await
    .context("upsert notification settings")
}

/// Creates a notification unless the user switched that kind off.
pub async fn notify(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> anyhow::Result<bool> {
    if !settings(&mut *conn, user_id).await?.allows(kind) {
        return Ok(false);
    }
    sqlx::query(
        "INSERT INTO notifications (user_id, title, message, kind) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(kind.as_str())
    .execute(conn)
    .await
    .context("insert notification")?;
    Ok(true)
}
