use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgConnection;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    day::{self, DayQuery},
    error::{AppError, AppResult},
    extract::Json,
    gamification::{self, StreakType},
    state::AppState,
};

use super::{
    dto::{FoodRequest, GoalsRequest, LogFavoriteRequest, MealRequest},
    repo,
    repo_types::{DailyGoals, FavoriteMeal, Meal},
    services::{self, Food, Intake},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/daily", get(daily))
        .route("/nutrition/goals", put(set_goals))
        .route("/nutrition/meals", get(list_meals).post(log_meal))
        .route("/nutrition/meals/:id", delete(delete_meal))
        .route("/nutrition/favorites", get(list_favorites).post(add_favorite))
        .route("/nutrition/favorites/:id", delete(delete_favorite))
        .route("/nutrition/favorites/:id/log", post(log_favorite))
}

/// The day's row, or default targets when nothing was logged yet.
pub async fn daily_or_default(
    state: &AppState,
    user_id: Uuid,
    date: time::Date,
) -> AppResult<DailyGoals> {
    let mut conn = state.db.acquire().await?;
    Ok(repo::goals_for_day(&mut conn, user_id, date)
        .await?
        .unwrap_or_else(|| DailyGoals::defaults(date)))
}

#[instrument(skip(state))]
pub async fn daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<DailyGoals>> {
    Ok(Json(daily_or_default(&state, user_id, q.day()).await?))
}

#[instrument(skip(state, payload))]
pub async fn set_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GoalsRequest>,
) -> AppResult<Json<DailyGoals>> {
    let targets = services::targets(&payload)?;
    let date = payload.date.unwrap_or_else(day::today);
    Ok(Json(
        repo::upsert_targets(&state.db, user_id, date, &targets).await?,
    ))
}

/// Inserts the meal, adds it to the day's totals and counts the day towards
/// the nutrition streak. Callers own the transaction.
async fn record_meal(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: time::Date,
    meal_type: &str,
    food: &Food,
) -> anyhow::Result<Meal> {
    let meal = repo::insert_meal(&mut *conn, user_id, date, meal_type, food).await?;
    repo::add_intake(&mut *conn, user_id, date, food.intake()).await?;
    gamification::repo::record_activity(conn, user_id, StreakType::Nutrition, date).await?;
    debug!(%user_id, meal_id = %meal.id, meal_type, calories = food.calories, "meal logged");
    Ok(meal)
}

#[instrument(skip(state, payload))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MealRequest>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    let meal_type = services::meal_type(&payload.meal_type)?;
    let food = services::food(payload.food)?;
    let date = payload.date.unwrap_or_else(day::today);

    let mut tx = state.db.begin().await?;
    let meal = record_meal(&mut tx, user_id, date, meal_type, &food).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<Vec<Meal>>> {
    Ok(Json(repo::list_meals(&state.db, user_id, q.day()).await?))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    let meal = repo::delete_meal(&mut tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;
    repo::add_intake(&mut tx, user_id, meal.date, Intake::from(&meal).negate()).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<FavoriteMeal>>> {
    Ok(Json(repo::list_favorites(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<FoodRequest>,
) -> AppResult<(StatusCode, Json<FavoriteMeal>)> {
    let food = services::food(payload)?;
    let fav = repo::insert_favorite(&state.db, user_id, &food).await?;
    Ok((StatusCode::CREATED, Json(fav)))
}

#[instrument(skip(state))]
pub async fn delete_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !repo::delete_favorite(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("Favorite meal"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn log_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LogFavoriteRequest>,
) -> AppResult<(StatusCode, Json<Meal>)> {
    let meal_type = services::meal_type(&payload.meal_type)?;
    let date = payload.date.unwrap_or_else(day::today);

    let mut tx = state.db.begin().await?;
    let fav = repo::use_favorite(&mut tx, user_id, id)
        .await?
        .ok_or(AppError::NotFound("Favorite meal"))?;
    let meal = record_meal(&mut tx, user_id, date, meal_type, &Food::from(&fav)).await?;
    tx.commit().await?;

    debug!(%user_id, favorite_id = %id, times_used = fav.times_used, "favorite meal logged");
    Ok((StatusCode::CREATED, Json(meal)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    #[tokio::test]
    async fn daily_needs_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(
                Request::get("/nutrition/daily?date=2024-05-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn meal_request_flattens_food_fields() {
        let req: MealRequest = serde_json::from_str(
            r#"{"date":"2024-05-01","meal_type":"lunch","food_name":"Arroz","calories":200,"carbs":45,"protein":4,"fat":1}"#,
        )
        .unwrap();
        assert_eq!(req.meal_type, "lunch");
        assert_eq!(req.food.food_name, "Arroz");
        assert_eq!(req.food.carbs, 45);
        assert_eq!(req.date, Some(time::macros::date!(2024 - 05 - 01)));
    }
}
