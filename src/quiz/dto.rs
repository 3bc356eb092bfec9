use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::catalog::QuizQuestion;
use super::services::{summary, QuizAnswers, QuizSession};

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    InProgress,
    Completed,
}

/// What the client renders: the current question or the final screen.
#[derive(Debug, Serialize)]
pub struct QuizView {
    pub status: QuizStatus,
    pub position: usize,
    pub total: usize,
    pub question: Option<&'static QuizQuestion>,
    pub selected: Option<String>,
    pub answers: QuizAnswers,
    pub summary: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl QuizView {
    pub fn in_progress(session: &QuizSession, total: usize) -> Self {
        Self {
            status: QuizStatus::InProgress,
            position: session.current() + 1,
            total,
            question: Some(session.question()),
            selected: session.selected().map(str::to_string),
            answers: session.answers().clone(),
            summary: None,
            completed_at: None,
        }
    }

    pub fn completed(answers: QuizAnswers, completed_at: OffsetDateTime, total: usize) -> Self {
        Self {
            status: QuizStatus::Completed,
            position: total,
            total,
            question: None,
            selected: None,
            summary: Some(summary(&answers)),
            answers,
            completed_at: Some(completed_at),
        }
    }
}
