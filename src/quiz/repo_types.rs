use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;

use super::services::QuizAnswers;

#[derive(Debug, FromRow)]
pub struct QuizProgressRow {
    pub current_question: i32,
    pub answers: Json<QuizAnswers>,
}

#[derive(Debug, FromRow)]
pub struct QuizResultRow {
    pub answers: Json<QuizAnswers>,
    pub completed_at: OffsetDateTime,
}
