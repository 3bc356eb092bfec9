use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::{debug, info, instrument};

use crate::{auth::AuthUser, error::AppResult, extract::Json, state::AppState};

use super::{
    dto::{AppendMessageRequest, HistoryQuery},
    repo,
    repo_types::ChatMessage,
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/chat/messages",
        get(list).post(append).delete(clear),
    )
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let limit = services::limit(q.limit);
    Ok(Json(repo::recent(&state.db, user_id, limit).await?))
}

#[instrument(skip(state, payload))]
pub async fn append(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AppendMessageRequest>,
) -> AppResult<(StatusCode, Json<ChatMessage>)> {
    let role = services::role(&payload.role)?;
    let message = services::message(&payload.message)?;
    let saved = repo::append(&state.db, user_id, role, &message).await?;
    debug!(%user_id, role, chars = message.chars().count(), "chat message stored");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<StatusCode> {
    let removed = repo::clear(&state.db, user_id).await?;
    info!(%user_id, removed, "chat history cleared");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn history_needs_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/chat/messages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::{error::AppError, state::seed_user};
    use sqlx::PgPool;
    use uuid::Uuid;

    async fn say(state: &AppState, user: Uuid, role: &str, text: &str) -> AppResult<ChatMessage> {
        let payload = AppendMessageRequest {
            role: role.into(),
            message: text.into(),
        };
        append(State(state.clone()), AuthUser(user), Json(payload))
            .await
            .map(|(_, Json(m))| m)
    }

    async fn history(state: &AppState, user: Uuid, limit: Option<i64>) -> Vec<String> {
        let Json(rows) = list(State(state.clone()), AuthUser(user), Query(HistoryQuery { limit }))
            .await
            .unwrap();
        rows.into_iter().map(|m| m.message).collect()
    }

    #[sqlx::test]
    async fn history_is_per_user_and_chronological(pool: PgPool) {
        let state = AppState::with_pool(pool);
        let ana = seed_user(&state.db).await;
        let bia = seed_user(&state.db).await;

        say(&state, ana, "user", "Oi").await.unwrap();
        say(&state, ana, "assistant", "Olá! Como posso ajudar?").await.unwrap();
        say(&state, ana, "user", "Quanto de água?").await.unwrap();
        say(&state, bia, "user", "Outro usuário").await.unwrap();

        assert_eq!(
            history(&state, ana, None).await,
            ["Oi", "Olá! Como posso ajudar?", "Quanto de água?"]
        );
        assert_eq!(
            history(&state, ana, Some(2)).await,
            ["Olá! Como posso ajudar?", "Quanto de água?"]
        );
        assert_eq!(history(&state, bia, None).await, ["Outro usuário"]);

        clear(State(state.clone()), AuthUser(ana)).await.unwrap();
        assert!(history(&state, ana, None).await.is_empty());
        assert_eq!(history(&state, bia, None).await.len(), 1);
    }

    #[sqlx::test]
    async fn bad_messages_are_not_stored(pool: PgPool) {
        let state = AppState::with_pool(pool);
        let user = seed_user(&state.db).await;

        let err = say(&state, user, "system", "hi").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = say(&state, user, "user", "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(history(&state, user, None).await.is_empty());
    }
}
