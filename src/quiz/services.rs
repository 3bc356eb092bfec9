use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

use super::catalog::{QuizQuestion, QUESTIONS};

/// Question key → chosen option value.
pub type QuizAnswers = BTreeMap<String, String>;

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Advanced,
    Finished,
}

/// Linear walk through the question catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSession {
    current: usize,
    answers: QuizAnswers,
}

impl QuizSession {
    /// Rebuilds a session from stored progress; a stale index is clamped.
    pub fn resume(current: i32, answers: QuizAnswers) -> Self {
        let current = usize::try_from(current)
            .unwrap_or(0)
            .min(QUESTIONS.len() - 1);
        Self { current, answers }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    pub fn into_answers(self) -> QuizAnswers {
        self.answers
    }

    pub fn question(&self) -> &'static QuizQuestion {
        &QUESTIONS[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current == QUESTIONS.len() - 1
    }

    /// Answer already given for the current question, if the user came back to it.
    pub fn selected(&self) -> Option<&str> {
        self.answers.get(self.question().key).map(String::as_str)
    }

    pub fn answer(&mut self, value: &str) -> AppResult<Step> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::validation("an option must be selected"));
        }
        let question = self.question();
        if !question.accepts(value) {
            return Err(AppError::validation(format!(
                "'{value}' is not an option for {}",
                question.key
            )));
        }

        self.answers.insert(question.key.to_string(), value.to_string());
        if self.is_last() {
            Ok(Step::Finished)
        } else {
            self.current += 1;
            Ok(Step::Advanced)
        }
    }

    /// Steps back one question; returns false on the first one.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Progress is only worth storing once something was answered.
    pub fn has_progress(&self) -> bool {
        !self.answers.is_empty()
    }
}

fn goal_phrase(value: &str) -> Option<&'static str> {
    match value {
        "lose_weight" => Some("emagrecer"),
        "gain_muscle" => Some("ganhar massa muscular"),
        "tone_body" => Some("definir o corpo"),
        "improve_health" => Some("melhorar saúde e energia"),
        _ => None,
    }
}

fn activity_phrase(value: &str) -> Option<&'static str> {
    match value {
        "sedentary" => Some("sedentário"),
        "lightly_active" => Some("levemente ativo"),
        "moderately_active" => Some("moderadamente ativo"),
        "very_active" => Some("muito ativo"),
        _ => None,
    }
}

pub fn summary(answers: &QuizAnswers) -> String {
    let goal = answers
        .get("main_goal")
        .and_then(|v| goal_phrase(v))
        .unwrap_or("melhorar sua saúde");
    let activity = answers
        .get("activity_level")
        .and_then(|v| activity_phrase(v))
        .unwrap_or("iniciante");
    format!(
        "Seu objetivo é {goal} e você está {activity}. Vamos criar um plano personalizado \
         para você alcançar seus resultados de forma sustentável."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RUN: [&str; 6] = [
        "gain_muscle",
        "lightly_active",
        "few_times",
        "motivation",
        "planning_to",
        "3_4_days",
    ];

    #[test]
    fn fresh_session_starts_at_first_question() {
        let s = QuizSession::default();
        assert_eq!(s.current(), 0);
        assert_eq!(s.question().key, "main_goal");
        assert_eq!(s.selected(), None);
        assert!(!s.has_progress());
    }

    #[test]
    fn each_valid_answer_advances_one_question() {
        let mut s = QuizSession::default();
        assert_eq!(s.answer("lose_weight").unwrap(), Step::Advanced);
        assert_eq!(s.current(), 1);
        assert_eq!(s.question().key, "activity_level");
        assert_eq!(s.answers()["main_goal"], "lose_weight");
    }

    #[test]
    fn empty_or_foreign_values_do_not_advance() {
        let mut s = QuizSession::default();
        assert!(s.answer("").is_err());
        assert!(s.answer("   ").is_err());
        assert!(s.answer("very_active").is_err());
        assert_eq!(s.current(), 0);
        assert!(s.answers().is_empty());
    }

    #[test]
    fn last_answer_finishes_without_moving_past_the_end() {
        let mut s = QuizSession::default();
        for (i, value) in FULL_RUN.iter().enumerate() {
            let step = s.answer(value).unwrap();
            if i == FULL_RUN.len() - 1 {
                assert_eq!(step, Step::Finished);
            } else {
                assert_eq!(step, Step::Advanced);
            }
        }
        assert_eq!(s.current(), QUESTIONS.len() - 1);
        assert_eq!(s.answers().len(), QUESTIONS.len());
    }

    #[test]
    fn back_restores_previous_selection_and_stops_at_zero() {
        let mut s = QuizSession::default();
        s.answer("tone_body").unwrap();
        assert!(s.back());
        assert_eq!(s.current(), 0);
        assert_eq!(s.selected(), Some("tone_body"));
        assert!(!s.back());
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn changing_an_earlier_answer_overwrites_it() {
        let mut s = QuizSession::default();
        s.answer("tone_body").unwrap();
        s.back();
        s.answer("improve_health").unwrap();
        assert_eq!(s.answers()["main_goal"], "improve_health");
        assert_eq!(s.current(), 1);
    }

    #[test]
    fn resume_clamps_out_of_range_indices() {
        assert_eq!(QuizSession::resume(-3, QuizAnswers::new()).current(), 0);
        assert_eq!(
            QuizSession::resume(99, QuizAnswers::new()).current(),
            QUESTIONS.len() - 1
        );
        assert_eq!(QuizSession::resume(2, QuizAnswers::new()).current(), 2);
    }

    #[test]
    fn summary_uses_goal_and_activity() {
        let mut answers = QuizAnswers::new();
        answers.insert("main_goal".into(), "gain_muscle".into());
        answers.insert("activity_level".into(), "very_active".into());
        let text = summary(&answers);
        assert!(text.starts_with("Seu objetivo é ganhar massa muscular e você está muito ativo."));
    }

    #[test]
    fn summary_falls_back_on_missing_answers() {
        let text = summary(&QuizAnswers::new());
        assert!(text.contains("melhorar sua saúde"));
        assert!(text.contains("iniciante"));
    }
}
