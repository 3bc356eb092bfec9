use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    day,
    error::{AppError, AppResult},
    extract::Json,
    gamification::{self, StreakType},
    notifications::{self, NotificationKind},
    state::AppState,
};

use super::{
    dto::{CreateSupplementRequest, RefillRequest, SupplementCard, UpdateSupplementRequest},
    repo,
    repo_types::SupplementLog,
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/supplements", get(list).post(create))
        .route("/supplements/logs/today", get(today_logs))
        .route(
            "/supplements/:id",
            get(get_one).put(update).delete(remove),
        )
        .route("/supplements/:id/take", post(take))
        .route("/supplements/:id/refill", post(refill))
}

async fn doses_today(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<i64> {
    let (start, end) = day::bounds(day::today());
    let mut conn = state.db.acquire().await?;
    Ok(repo::count_doses(&mut conn, user_id, id, start, end).await?)
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<SupplementCard>>> {
    let (start, end) = day::bounds(day::today());
    let counts = repo::dose_counts(&state.db, user_id, start, end).await?;
    let cards = repo::list(&state.db, user_id)
        .await?
        .into_iter()
        .map(|s| {
            let taken = counts.get(&s.id).copied().unwrap_or(0);
            services::card(s, taken)
        })
        .collect();
    Ok(Json(cards))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateSupplementRequest>,
) -> AppResult<(StatusCode, Json<SupplementCard>)> {
    let draft = services::draft_new(payload)?;
    let created = repo::insert(&state.db, user_id, &draft).await?;
    info!(%user_id, supplement_id = %created.id, "supplement added");
    Ok((StatusCode::CREATED, Json(services::card(created, 0))))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SupplementCard>> {
    let s = repo::find(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    let taken = doses_today(&state, user_id, id).await?;
    Ok(Json(services::card(s, taken)))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplementRequest>,
) -> AppResult<Json<SupplementCard>> {
    let current = repo::find(&state.db, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    let draft = services::draft_update(&current, payload)?;
    let updated = repo::update(&state.db, user_id, id, &draft)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    let taken = doses_today(&state, user_id, id).await?;
    Ok(Json(services::card(updated, taken)))
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Supplement"));
    }
    info!(%user_id, supplement_id = %id, "supplement removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Logs one dose. The row lock serializes concurrent takes of the same supplement.
#[instrument(skip(state))]
pub async fn take(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SupplementCard>> {
    let now = OffsetDateTime::now_utc();
    let today = now.date();
    let (start, end) = day::bounds(today);

    let mut tx = state.db.begin().await?;
    let current = repo::lock(&mut tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    let taken = repo::count_doses(&mut tx, user_id, id, start, end).await?;
    let outcome = services::plan_take(&current, taken)?;

    repo::insert_log(&mut tx, user_id, id, now).await?;
    let updated = repo::set_stock(
        &mut tx,
        id,
        outcome.remaining,
        current.total_capsules,
        outcome.status.as_str(),
    )
    .await?;

    gamification::repo::record_activity(&mut tx, user_id, StreakType::Supplements, today).await?;

    if let Some(alert) = outcome.alert {
        let (title, message) = services::alert_message(&updated.name, alert, outcome.remaining);
        notifications::repo::notify(&mut tx, user_id, NotificationKind::Supplement, &title, &message)
            .await?;
        info!(%user_id, supplement_id = %id, status = alert.as_str(), "supplement stock alert");
    }
    tx.commit().await?;

    Ok(Json(services::card(updated, taken + 1)))
}

#[instrument(skip(state, payload))]
pub async fn refill(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RefillRequest>,
) -> AppResult<Json<SupplementCard>> {
    let (start, end) = day::bounds(day::today());

    let mut tx = state.db.begin().await?;
    let current = repo::lock(&mut tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Supplement"))?;
    let (remaining, total, status) = services::plan_refill(&current, payload.capsules)?;
    let updated = repo::set_stock(&mut tx, id, remaining, total, status.as_str()).await?;
    let taken = repo::count_doses(&mut tx, user_id, id, start, end).await?;
    tx.commit().await?;

    info!(%user_id, supplement_id = %id, capsules = payload.capsules, "supplement refilled");
    Ok(Json(services::card(updated, taken)))
}

#[instrument(skip(state))]
pub async fn today_logs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<SupplementLog>>> {
    let (start, end) = day::bounds(day::today());
    Ok(Json(repo::logs_between(&state.db, user_id, start, end).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn supplements_need_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/supplements").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn incomplete_body_gets_json_validation_error() {
        use crate::auth::services::JwtKeys;
        use axum::extract::FromRef;

        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state)
            .sign_access(Uuid::new_v4())
            .unwrap();
        let app = routes().with_state(state);
        let res = app
            .oneshot(
                Request::post("/supplements")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"X","dosage":"1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("total_capsules"));
    }

    #[tokio::test]
    async fn take_with_bad_id_is_rejected() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::post("/supplements/not-a-uuid/take")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.status().is_client_error());
    }
}
