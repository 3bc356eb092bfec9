use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    day::DayQuery,
    error::{AppError, AppResult},
    extract::Json,
    gamification::{self, StreakType},
    state::AppState,
};

use super::{
    dto::{ExerciseFilter, LogWorkoutRequest},
    repo,
    repo_types::{Exercise, WorkoutLog},
    services,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/workouts", get(list_workouts).post(log_workout))
        .route("/workouts/:id", delete(delete_workout))
}

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(filter): Query<ExerciseFilter>,
) -> AppResult<Json<Vec<Exercise>>> {
    let category = services::filter_value(filter.category);
    let muscle_group = services::filter_value(filter.muscle_group);
    Ok(Json(
        repo::list_exercises(&state.db, category.as_deref(), muscle_group.as_deref()).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn log_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LogWorkoutRequest>,
) -> AppResult<(StatusCode, Json<WorkoutLog>)> {
    let draft = services::draft(payload)?;

    let mut tx = state.db.begin().await?;
    if let Some(exercise_id) = draft.exercise_id {
        if !repo::exercise_exists(&mut tx, exercise_id).await? {
            return Err(AppError::NotFound("Exercise"));
        }
    }
    let log = repo::insert_log(&mut tx, user_id, &draft).await?;
    gamification::repo::record_activity(&mut tx, user_id, StreakType::Workout, draft.date).await?;
    tx.commit().await?;

    info!(%user_id, workout_id = %log.id, exercise = ?log.exercise_name, "workout logged");
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<Vec<WorkoutLog>>> {
    Ok(Json(repo::list_logs(&state.db, user_id, q.day()).await?))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_log(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Workout"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn exercises_need_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::get("/exercises?category=strength")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
