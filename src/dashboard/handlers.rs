use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::AuthUser,
    day::{self, DayQuery},
    error::AppResult,
    extract::Json,
    fasting,
    gamification::{self, StreakType},
    nutrition, supplements,
    state::AppState,
    workouts,
};

use super::{
    dto::DashboardStats,
    services::{self, Snapshot},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<DashboardStats>> {
    let date = q.day();
    let (start, end) = day::bounds(date);

    let goals = nutrition::handlers::daily_or_default(&state, user_id, date).await?;
    let active_fast = fasting::repo::active(&state.db, user_id).await?;
    let workouts = workouts::repo::count_for_day(&state.db, user_id, date).await?;
    let (due, taken) = supplements::repo::dose_summary(&state.db, user_id, start, end).await?;
    let streak =
        gamification::repo::current_count(&state.db, user_id, StreakType::Overall).await?;

    Ok(Json(services::stats(
        Snapshot {
            goals,
            active_fast,
            workouts,
            supplement_doses_due: due,
            supplement_doses_taken: taken,
            overall_streak: streak,
        },
        OffsetDateTime::now_utc(),
    )))
}
