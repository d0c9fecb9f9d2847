// src/gateway/mod.rs

pub mod rest;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::attempt::{AttemptRecord, NewAttempt};
use crate::models::quiz::{Quiz, QuizSummary};

pub use rest::RestGateway;

/// The controller's only boundary: quiz retrieval and attempt persistence
/// over the hosted table store.
///
/// The controller calls `fetch_quiz_with_questions` once per attempt and
/// `persist_attempt` once per finalization; `list_quizzes` and
/// `fetch_past_attempts` serve the quiz-list view, never the controller.
#[async_trait]
pub trait QuizGateway: Send + Sync {
    /// Returns all quizzes as list-view summaries.
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, GatewayError>;

    /// Returns quiz metadata plus its full ordered question list.
    async fn fetch_quiz_with_questions(&self, quiz_id: i64) -> Result<Quiz, GatewayError>;

    /// Durably stores a finalized attempt snapshot and returns the stored
    /// row with its assigned id and timestamps.
    async fn persist_attempt(&self, record: NewAttempt) -> Result<AttemptRecord, GatewayError>;

    /// Past attempts of one student on one quiz, newest first.
    async fn fetch_past_attempts(
        &self,
        student_id: &str,
        quiz_id: i64,
    ) -> Result<Vec<AttemptRecord>, GatewayError>;
}
