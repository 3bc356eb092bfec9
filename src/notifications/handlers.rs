use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
    validate,
};

use super::{
    dto::{ListQuery, MarkedRead, SettingsRequest},
    repo,
    repo_types::{Notification, NotificationSettings},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list))
        .route("/notifications/read-all", post(read_all))
        .route("/notifications/:id/read", post(read_one))
        .route(
            "/notifications/settings",
            get(get_settings).put(put_settings),
        )
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(repo::list(&state.db, user_id, q.unread_only).await?))
}

#[instrument(skip(state))]
pub async fn read_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::mark_read(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Notification"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn read_all(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MarkedRead>> {
    let updated = repo::mark_all_read(&state.db, user_id).await?;
    Ok(Json(MarkedRead { updated }))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<NotificationSettings>> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(repo::settings(&mut conn, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn put_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SettingsRequest>,
) -> AppResult<Json<NotificationSettings>> {
    let settings = NotificationSettings {
        water_enabled: payload.water_enabled,
        supplement_enabled: payload.supplement_enabled,
        workout_enabled: payload.workout_enabled,
        reminder_times: validate::reminder_times(payload.reminder_times)?,
    };
    Ok(Json(repo::save_settings(&state.db, user_id, &settings).await?))
}
