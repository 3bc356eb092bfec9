use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::AuthUser,
    day::{self, DayQuery},
    error::AppResult,
    extract::Json,
    gamification::{self, StreakType},
    nutrition::{self, Intake},
    state::AppState,
};

use super::{
    dto::{AddWaterRequest, WaterDay},
    repo,
    repo_types::WaterLog,
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/water", get(day_summary).post(add))
}

#[instrument(skip(state, payload))]
pub async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddWaterRequest>,
) -> AppResult<(StatusCode, Json<WaterLog>)> {
    let amount = services::check_amount(payload.amount_ml)?;
    let date = payload.date.unwrap_or_else(day::today);

    let mut tx = state.db.begin().await?;
    let entry = repo::insert(&mut tx, user_id, date, amount).await?;
    let goals = nutrition::repo::add_intake(&mut tx, user_id, date, Intake::water(amount)).await?;
    gamification::repo::record_activity(&mut tx, user_id, StreakType::Water, date).await?;
    tx.commit().await?;

    debug!(%user_id, amount, total = goals.water_consumed, "water logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn day_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<WaterDay>> {
    let date = q.day();
    let entries = repo::list_for_day(&state.db, user_id, date).await?;
    let goals = nutrition::handlers::daily_or_default(&state, user_id, date).await?;
    Ok(Json(services::summarize(date, entries, goals.water_target)))
}
