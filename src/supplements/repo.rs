use std::collections::HashMap;

use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Supplement, SupplementDraft, SupplementLog};

const COLUMNS: &str = "id, name, dosage, total_capsules, remaining_capsules, daily_frequency, \
                       reminder_times, status, created_at, updated_at";

pub async fn list(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Supplement>> {
    sqlx::query_as::<_, Supplement>(&format!(
        "SELECT {COLUMNS} FROM supplements WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list supplements")
}

pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Supplement>> {
    sqlx::query_as::<_, Supplement>(&format!(
        "SELECT {COLUMNS} FROM supplements WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("select supplement")
}

/// Row lock held until the surrounding transaction ends.
pub async fn lock(
    conn: &mut PgConnection,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<Option<Supplement>> {
    sqlx::query_as::<_, Supplement>(&format!(
        "SELECT {COLUMNS} FROM supplements WHERE id = $1 AND user_id = $2 FOR UPDATE"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("lock supplement")
}

pub async fn insert(db: &PgPool, user_id: Uuid, d: &SupplementDraft) -> anyhow::Result<Supplement> {
    sqlx::query_as::<_, Supplement>(&format!(
        r#"
        INSERT INTO supplements
            (user_id, name, dosage, total_capsules, remaining_capsules,
             daily_frequency, reminder_times, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&d.name)
    .bind(&d.dosage)
    .bind(d.total_capsules)
    .bind(d.remaining_capsules)
    .bind(d.daily_frequency)
    .bind(&d.reminder_times)
    .bind(d.status)
    .fetch_one(db)
    .await
    .context("insert supplement")
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    d: &SupplementDraft,
) -> anyhow::Result<Option<Supplement>> {
    sqlx::query_as::<_, Supplement>(&format!(
        r#"
        UPDATE supplements SET
            name = $3,
            dosage = $4,
            total_capsules = $5,
            remaining_capsules = $6,
            daily_frequency = $7,
            reminder_times = $8,
            status = $9,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&d.name)
    .bind(&d.dosage)
    .bind(d.total_capsules)
    .bind(d.remaining_capsules)
    .bind(d.daily_frequency)
    .bind(&d.reminder_times)
    .bind(d.status)
    .fetch_optional(db)
    .await
    .context("update supplement")
}

/// Logs cascade with the supplement.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM supplements WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete supplement")?;
    Ok(res.rows_affected() == 1)
}

pub async fn set_stock(
    conn: &mut PgConnection,
    id: Uuid,
    remaining: i32,
    total: i32,
    status: &str,
) -> anyhow::Result<Supplement> {
    sqlx::query_as::<_, Supplement>(&format!(
        r#"
        UPDATE supplements SET
            remaining_capsules = $2,
            total_capsules = $3,
            status = $4,
            updated_at = now()
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(remaining)
    .bind(total)
    .bind(status)
    .fetch_one(conn)
    .await
    .context("update supplement stock")
}

pub async fn count_doses(
    conn: &mut PgConnection,
    user_id: Uuid,
    supplement_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM supplement_logs
        WHERE supplement_id = $1 AND user_id = $2 AND taken_at >= $3 AND taken_at < $4
        "#,
    )
    .bind(supplement_id)
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await
    .context("count supplement doses")
}

pub async fn insert_log(
    conn: &mut PgConnection,
    user_id: Uuid,
    supplement_id: Uuid,
    taken_at: OffsetDateTime,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO supplement_logs (supplement_id, user_id, taken_at) VALUES ($1, $2, $3)")
        .bind(supplement_id)
        .bind(user_id)
        .bind(taken_at)
        .execute(conn)
        .await
        .context("insert supplement log")?;
    Ok(())
}

pub async fn logs_between(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<Vec<SupplementLog>> {
    sqlx::query_as::<_, SupplementLog>(
        r#"
        SELECT l.id, l.supplement_id, s.name AS supplement_name, l.taken_at
        FROM supplement_logs l
        JOIN supplements s ON s.id = l.supplement_id
        WHERE l.user_id = $1 AND l.taken_at >= $2 AND l.taken_at < $3
        ORDER BY l.taken_at DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("list supplement logs")
}

/// Doses per supplement within `[start, end)`.
pub async fn dose_counts(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<HashMap<Uuid, i64>> {
    let rows = sqlx::query_as::<_, (Uuid, i64)>(
        r#"
        SELECT supplement_id, COUNT(*)
        FROM supplement_logs
        WHERE user_id = $1 AND taken_at >= $2 AND taken_at < $3
        GROUP BY supplement_id
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("count doses per supplement")?;
    Ok(rows.into_iter().collect())
}

/// `(doses due per day, doses taken within [start, end))` across all supplements.
pub async fn dose_summary(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<(i64, i64)> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE((SELECT SUM(daily_frequency) FROM supplements WHERE user_id = $1), 0)::BIGINT,
            (SELECT COUNT(*) FROM supplement_logs
             WHERE user_id = $1 AND taken_at >= $2 AND taken_at < $3)
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
    .context("summarize supplement doses")
}
