use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use sqlx::PgConnection;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    profile,
    state::AppState,
};

use super::{
    dto::{ChangePlanRequest, PlanView},
    repo,
    repo_types::Subscription,
    services::{self, Plan, Status},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscription", get(current).put(change_plan))
        .route("/subscription/cancel", post(cancel))
        .route("/subscription/history", get(history))
}

/// Locks the active row, first expiring it when its period has run out.
async fn active_now(
    conn: &mut PgConnection,
    user_id: Uuid,
    now: OffsetDateTime,
) -> anyhow::Result<Option<Subscription>> {
    let Some(sub) = repo::lock_active(&mut *conn, user_id).await? else {
        return Ok(None);
    };
    if !services::has_lapsed(&sub, now) {
        return Ok(Some(sub));
    }

    let end = sub.end_date.unwrap_or(now);
    repo::close(&mut *conn, sub.id, Status::Expired, end).await?;
    profile::repo::set_pro(conn, user_id, false).await?;
    info!(%user_id, plan = %sub.plan, "subscription expired");
    Ok(None)
}

#[instrument(skip(state))]
pub async fn current(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PlanView>> {
    let mut tx = state.db.begin().await?;
    let active = active_now(&mut tx, user_id, OffsetDateTime::now_utc()).await?;
    tx.commit().await?;
    Ok(Json(services::view(active.as_ref())))
}

/// Replaces the active plan. Asking for the plan already running is a no-op.
#[instrument(skip(state, payload))]
pub async fn change_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePlanRequest>,
) -> AppResult<Json<PlanView>> {
    let plan = Plan::parse(&payload.plan)?;
    let now = OffsetDateTime::now_utc();

    let mut tx = state.db.begin().await?;
    let active = active_now(&mut tx, user_id, now).await?;
    if let Some(sub) = active.as_ref().filter(|s| s.plan == plan.as_str()) {
        let view = services::view(Some(sub));
        tx.commit().await?;
        return Ok(Json(view));
    }

    let had_trial = repo::had_trial(&mut tx, user_id).await?;
    services::check_switch(plan, had_trial)?;

    if let Some(old) = &active {
        repo::close(&mut tx, old.id, Status::Cancelled, now).await?;
    }
    let (start, end) = services::open(plan, now);
    let sub = repo::open(&mut tx, user_id, plan, start, end).await?;
    profile::repo::set_pro(&mut tx, user_id, plan.is_pro()).await?;
    tx.commit().await?;

    info!(
        %user_id,
        from = active.as_ref().map(|s| s.plan.as_str()).unwrap_or("free"),
        to = plan.as_str(),
        "plan changed"
    );
    Ok(Json(services::view(Some(&sub))))
}

/// Ends the running paid or trial plan; the user drops back to free.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PlanView>> {
    let now = OffsetDateTime::now_utc();

    let mut tx = state.db.begin().await?;
    let sub = active_now(&mut tx, user_id, now)
        .await?
        .filter(|s| s.plan != Plan::Free.as_str())
        .ok_or(AppError::NotFound("Active subscription"))?;
    repo::close(&mut tx, sub.id, Status::Cancelled, now).await?;
    profile::repo::set_pro(&mut tx, user_id, false).await?;
    tx.commit().await?;

    info!(%user_id, plan = %sub.plan, "subscription cancelled");
    Ok(Json(services::view(None)))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Subscription>>> {
    Ok(Json(repo::history(&state.db, user_id).await?))
}
