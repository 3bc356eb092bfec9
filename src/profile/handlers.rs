use axum::{extract::State, routing::get, Router};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
};

use super::{dto::UpsertProfileRequest, repo, repo_types::Profile, services};

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(put_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Profile>> {
    repo::find(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Profile"))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> AppResult<Json<Profile>> {
    let req = services::normalize(payload)?;
    let profile = repo::upsert(&state.db, user_id, &req).await?;
    info!(%user_id, "profile saved");
    Ok(Json(profile))
}
