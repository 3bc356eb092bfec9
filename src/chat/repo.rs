use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::ChatMessage;

pub async fn append(
    db: &PgPool,
    user_id: Uuid,
    role: &str,
    message: &str,
) -> anyhow::Result<ChatMessage> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO ai_chat_history (user_id, role, message)
        VALUES ($1, $2, $3)
        RETURNING id, role, message, created_at
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(message)
    .fetch_one(db)
    .await
    .context("insert chat message")
}

/// The latest `limit` messages, oldest first.
pub async fn recent(db: &PgPool, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<ChatMessage>> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, role, message, created_at FROM (
            SELECT id, role, message, created_at
            FROM ai_chat_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
        ) latest
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list chat messages")
}

pub async fn clear(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM ai_chat_history WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("clear chat history")?;
    Ok(res.rows_affected())
}
