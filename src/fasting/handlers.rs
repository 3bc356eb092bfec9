use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
};

use super::{
    dto::{ActiveFast, StartFastRequest},
    repo,
    repo_types::FastingSession,
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fasting", get(history))
        .route("/fasting/active", get(active))
        .route("/fasting/start", post(start))
        .route("/fasting/stop", post(stop))
}

#[instrument(skip(state, payload))]
pub async fn start(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<StartFastRequest>,
) -> AppResult<(StatusCode, Json<FastingSession>)> {
    let (plan, target) = services::parse_plan(&payload.plan_type)?;
    let session = repo::start(&state.db, user_id, &plan, target, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(|| AppError::conflict("A fast is already in progress"))?;

    info!(%user_id, plan = %session.plan_type, "fast started");
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(state))]
pub async fn stop(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<FastingSession>> {
    let now = OffsetDateTime::now_utc();

    let mut tx = state.db.begin().await?;
    let current = repo::lock_active(&mut tx, user_id)
        .await?
        .ok_or(AppError::NotFound("Active fast"))?;
    let elapsed = services::elapsed_hours(current.start_time, now);
    let completed = services::is_completed(elapsed, current.target_hours);
    let finished = repo::finish(&mut tx, current.id, now, completed).await?;
    tx.commit().await?;

    info!(%user_id, elapsed, completed, "fast stopped");
    Ok(Json(finished))
}

#[instrument(skip(state))]
pub async fn active(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ActiveFast>> {
    let session = repo::active(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("Active fast"))?;
    Ok(Json(services::active_view(session, OffsetDateTime::now_utc())))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<FastingSession>>> {
    Ok(Json(repo::history(&state.db, user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn fasting_needs_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/fasting/active").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
