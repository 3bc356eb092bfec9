use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::{auth::AuthUser, error::AppResult, extract::Json, state::AppState};

use super::{
    repo,
    repo_types::{Achievement, Streak},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/streaks", get(list_streaks))
        .route("/achievements", get(list_achievements))
}

#[instrument(skip(state))]
pub async fn list_streaks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Streak>>> {
    Ok(Json(repo::list_streaks(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn list_achievements(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Achievement>>> {
    Ok(Json(repo::list_achievements(&state.db, user_id).await?))
}
