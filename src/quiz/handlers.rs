use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    profile,
    state::AppState,
};

use super::{
    catalog::{QuizQuestion, QUESTIONS},
    dto::{AnswerRequest, QuizView},
    repo,
    services::{QuizSession, Step},
};

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/quiz/questions", get(list_questions))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz", get(get_quiz).delete(reset_quiz))
        .route("/quiz/answer", post(answer))
        .route("/quiz/back", post(back))
}

pub async fn list_questions() -> Json<&'static [QuizQuestion]> {
    Json(QUESTIONS)
}

async fn load_session(state: &AppState, user_id: Uuid) -> AppResult<QuizSession> {
    Ok(repo::load_progress(&state.db, user_id)
        .await?
        .map(|row| QuizSession::resume(row.current_question, row.answers.0))
        .unwrap_or_default())
}

async fn completed_view(state: &AppState, user_id: Uuid) -> AppResult<Option<QuizView>> {
    Ok(repo::load_result(&state.db, user_id)
        .await?
        .map(|r| QuizView::completed(r.answers.0, r.completed_at, QUESTIONS.len())))
}

#[instrument(skip(state))]
pub async fn get_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<QuizView>> {
    if let Some(view) = completed_view(&state, user_id).await? {
        return Ok(Json(view));
    }
    let session = load_session(&state, user_id).await?;
    Ok(Json(QuizView::in_progress(&session, QUESTIONS.len())))
}

#[instrument(skip(state, payload))]
pub async fn answer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AnswerRequest>,
) -> AppResult<Json<QuizView>> {
    if repo::load_result(&state.db, user_id).await?.is_some() {
        return Err(AppError::conflict("Quiz already completed"));
    }

    let mut session = load_session(&state, user_id).await?;
    let question = session.question().key;

    match session.answer(&payload.value)? {
        Step::Advanced => {
            repo::save_progress(&state.db, user_id, &session).await?;
            debug!(%user_id, question, position = session.current() + 1, "quiz advanced");
            Ok(Json(QuizView::in_progress(&session, QUESTIONS.len())))
        }
        Step::Finished => {
            let answers = session.into_answers();
            let mut tx = state.db.begin().await?;
            let result = repo::complete_tx(&mut tx, user_id, &answers).await?;
            profile::repo::mark_onboarded_tx(
                &mut tx,
                user_id,
                answers.get("main_goal").map(String::as_str),
            )
            .await?;
            tx.commit().await?;

            info!(%user_id, "onboarding quiz completed");
            Ok(Json(QuizView::completed(
                result.answers.0,
                result.completed_at,
                QUESTIONS.len(),
            )))
        }
    }
}

#[instrument(skip(state))]
pub async fn back(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<QuizView>> {
    if repo::load_result(&state.db, user_id).await?.is_some() {
        return Err(AppError::conflict("Quiz already completed"));
    }

    let mut session = load_session(&state, user_id).await?;
    if session.back() && session.has_progress() {
        repo::save_progress(&state.db, user_id, &session).await?;
    }
    Ok(Json(QuizView::in_progress(&session, QUESTIONS.len())))
}

#[instrument(skip(state))]
pub async fn reset_quiz(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<QuizView>> {
    repo::reset(&state.db, user_id).await?;
    profile::repo::reset_onboarding(&state.db, user_id).await?;
    info!(%user_id, "onboarding quiz reset");
    Ok(Json(QuizView::in_progress(
        &QuizSession::default(),
        QUESTIONS.len(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn questions_are_public() {
        let app = public_routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::get("/quiz/questions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), QUESTIONS.len());
        assert_eq!(list[0]["key"], "main_goal");
        assert_eq!(list[0]["options"][1]["value"], "gain_muscle");
    }

    #[tokio::test]
    async fn progress_routes_need_auth() {
        let app = routes().with_state(AppState::fake());
        let res = app
            .oneshot(Request::post("/quiz/back").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn in_progress_view_reports_one_based_position() {
        let mut session = QuizSession::default();
        session.answer("lose_weight").unwrap();
        let view = QuizView::in_progress(&session, QUESTIONS.len());
        assert_eq!(view.position, 2);
        assert_eq!(view.question.unwrap().key, "activity_level");
        assert!(view.summary.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "in_progress");
    }

    #[test]
    fn completed_view_carries_summary() {
        let mut answers = crate::quiz::services::QuizAnswers::new();
        answers.insert("main_goal".into(), "lose_weight".into());
        let view = QuizView::completed(answers, time::OffsetDateTime::now_utc(), 6);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "completed");
        assert!(json["question"].is_null());
        assert!(json["summary"].as_str().unwrap().contains("emagrecer"));
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::{quiz::dto::QuizStatus, state::seed_user};
    use sqlx::PgPool;

    async fn pick(state: &AppState, user: Uuid, value: &str) -> AppResult<QuizView> {
        let payload = AnswerRequest {
            value: value.to_string(),
        };
        answer(State(state.clone()), AuthUser(user), Json(payload))
            .await
            .map(|Json(view)| view)
    }

    #[sqlx::test]
    async fn last_answer_completes_and_onboards(pool: PgPool) {
        let state = AppState::with_pool(pool);
        let user = seed_user(&state.db).await;

        let mut view = None;
        for (i, q) in QUESTIONS.iter().enumerate() {
            let v = pick(&state, user, q.options[0].value).await.unwrap();
            if i + 1 < QUESTIONS.len() {
                assert!(matches!(v.status, QuizStatus::InProgress));
                assert_eq!(v.position, i + 2);
            }
            view = Some(v);
        }
        let view = view.unwrap();
        assert!(matches!(view.status, QuizStatus::Completed));
        assert_eq!(view.answers.len(), QUESTIONS.len());
        assert!(view.summary.is_some());

        assert!(repo::load_progress(&state.db, user).await.unwrap().is_none());
        let profile = profile::repo::find(&state.db, user).await.unwrap().unwrap();
        assert!(profile.onboarding_completed);
        assert_eq!(profile.goal.as_deref(), Some(QUESTIONS[0].options[0].value));

        let err = pick(&state, user, QUESTIONS[0].options[0].value)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
