use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::notifications::{self, NotificationKind};

use super::{
    repo_types::{Achievement, Streak},
    services::{
        achievement_kind, achievement_title, advance, milestone_reached, StreakState, StreakType,
    },
};

pub async fn list_streaks(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Streak>> {
    sqlx::query_as::<_, Streak>(
        r#"
        SELECT streak_type, current_count, best_count, last_active_on
        FROM streaks
        WHERE user_id = $1
        ORDER BY streak_type
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list streaks")
}

pub async fn current_count(db: &PgPool, user_id: Uuid, kind: StreakType) -> anyhow::Result<i32> {
    let count = sqlx::query_scalar::<_, i32>(
        "SELECT current_count FROM streaks WHERE user_id = $1 AND streak_type = $2",
    )
    .bind(user_id)
    .bind(kind.as_str())
    .fetch_optional(db)
    .await
    .context("select streak count")?;
    Ok(count.unwrap_or(0))
}

pub async fn list_achievements(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Achievement>> {
    sqlx::query_as::<_, Achievement>(
        r#"
        SELECT id, kind, title, description, unlocked_at
        FROM achievements
        WHERE user_id = $1
        ORDER BY unlocked_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list achievements")
}

async fn bump(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: StreakType,
    day: Date,
) -> anyhow::Result<()> {
    let prev = sqlx::query_as::<_, (i32, i32, Date)>(
        r#"
        SELECT current_count, best_count, last_active_on
        FROM streaks
        WHERE user_id = $1 AND streak_type = $2
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .fetch_optional(&mut *conn)
    .await
    .context("select streak")?
    .map(|(current, best, last_active_on)| StreakState {
        current,
        best,
        last_active_on,
    });

    let before = prev.map(|p| p.current).unwrap_or(0);
    let next = advance(prev, day);
    if prev == Some(next) {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO streaks (user_id, streak_type, current_count, best_count, last_active_on)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, streak_type) DO UPDATE SET
            current_count = EXCLUDED.current_count,
            best_count = EXCLUDED.best_count,
            last_active_on = EXCLUDED.last_active_on
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(next.current)
    .bind(next.best)
    .bind(next.last_active_on)
    .execute(&mut *conn)
    .await
    .context("upsert streak")?;

    if let Some(milestone) = milestone_reached(before, next.current) {
        unlock(conn, user_id, kind, milestone).await?;
    }
    Ok(())
}

async fn unlock(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: StreakType,
    milestone: i32,
) -> anyhow::Result<()> {
    let title = achievement_title(kind, milestone);
    let inserted = sqlx::query(
        r#"
        INSERT INTO achievements (user_id, kind, title, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, kind) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(achievement_kind(kind, milestone))
    .bind(&title)
    .bind(format!("Você manteve a sequência por {milestone} dias seguidos."))
    .execute(&mut *conn)
    .await
    .context("insert achievement")?
    .rows_affected()
        == 1;

    if inserted {
        info!(%user_id, streak = kind.as_str(), milestone, "achievement unlocked");
        notifications::repo::notify(
            conn,
            user_id,
            NotificationKind::Achievement,
            "Nova conquista! 🏆",
            &title,
        )
        .await?;
    }
    Ok(())
}

/// Records a day of activity for `kind` and for the overall streak.
pub async fn record_activity(
    conn: &mut PgConnection,
    user_id: Uuid,
    kind: StreakType,
    day: Date,
) -> anyhow::Result<()> {
    bump(&mut *conn, user_id, kind, day).await?;
    if kind != StreakType::Overall {
        bump(conn, user_id, StreakType::Overall, day).await?;
    }
    Ok(())
}
