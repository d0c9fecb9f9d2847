// src/models/attempt.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-question review row inside a finalized attempt snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerReview {
    /// What the student picked, `None` when the question went unanswered.
    pub selected: Option<String>,

    /// The correct option value at grading time.
    pub correct: String,

    pub is_correct: bool,
}

/// Outbound record for a finalized attempt, written exactly once.
///
/// Key of `answers` is the question id; unanswered questions still get a
/// review row (with `selected: None`) so the snapshot covers the whole quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewAttempt {
    #[validate(length(min = 1, message = "student_id must not be empty."))]
    pub student_id: String,

    pub quiz_id: i64,

    /// Count of correctly answered questions.
    pub score: u32,

    pub total_questions: u32,

    /// Rounded percentage, 0 for an empty quiz.
    #[validate(range(max = 100))]
    pub percentage: u32,

    pub passed: bool,

    #[validate(custom(function = validate_answers))]
    pub answers: HashMap<i64, AnswerReview>,

    /// Seconds spent, clamped to the quiz time limit.
    pub time_taken_seconds: u32,

    pub started_at: chrono::DateTime<chrono::Utc>,

    pub completed_at: chrono::DateTime<chrono::Utc>,
}

fn validate_answers(
    answers: &HashMap<i64, AnswerReview>,
) -> Result<(), validator::ValidationError> {
    for review in answers.values() {
        if review.correct.is_empty() {
            return Err(validator::ValidationError::new("correct_answer_missing"));
        }
    }
    Ok(())
}

/// A stored attempt as returned by the backend. Never mutated after
/// creation; a student may hold several per quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: i64,

    pub student_id: String,

    pub quiz_id: i64,

    pub score: u32,

    pub total_questions: u32,

    pub percentage: u32,

    pub passed: bool,

    pub answers: HashMap<i64, AnswerReview>,

    pub time_taken_seconds: u32,

    pub started_at: chrono::DateTime<chrono::Utc>,

    pub completed_at: chrono::DateTime<chrono::Utc>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
