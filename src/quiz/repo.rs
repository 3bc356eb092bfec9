use anyhow::Context;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    repo_types::{QuizProgressRow, QuizResultRow},
    services::{QuizAnswers, QuizSession},
};

pub async fn load_progress(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<QuizProgressRow>> {
    sqlx::query_as::<_, QuizProgressRow>(
        "SELECT current_question, answers FROM quiz_progress WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("select quiz progress")
}

pub async fn save_progress(db: &PgPool, user_id: Uuid, session: &QuizSession) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO quiz_progress (user_id, current_question, answers)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET
            current_question = EXCLUDED.current_question,
            answers = EXCLUDED.answers,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(session.current() as i32)
    .bind(Json(session.answers()))
    .execute(db)
    .await
    .context("upsert quiz progress")?;
    Ok(())
}

pub async fn load_result(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<QuizResultRow>> {
    sqlx::query_as::<_, QuizResultRow>(
        "SELECT answers, completed_at FROM quiz_results WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("select quiz result")
}

/// Moves the finished answers from progress to results.
pub async fn complete_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    answers: &QuizAnswers,
) -> anyhow::Result<QuizResultRow> {
    sqlx::query("DELETE FROM quiz_progress WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **tx)
        .await
        .context("clear quiz progress")?;

    sqlx::query_as::<_, QuizResultRow>(
        r#"
        INSERT INTO quiz_results (user_id, answers)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET
            answers = EXCLUDED.answers,
            completed_at = now()
        RETURNING answers, completed_at
        "#,
    )
    .bind(user_id)
    .bind(Json(answers))
    .fetch_one(&mut **tx)
    .await
    .context("store quiz result")
}

pub async fn reset(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM quiz_progress WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("delete quiz progress")?;
    sqlx::query("DELETE FROM quiz_results WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .context("delete quiz result")?;
    tx.commit().await?;
    Ok(())
}
