// src/error.rs

use std::fmt;

/// Errors produced by the remote data gateway.
/// Mirrors the failure kinds the hosted backend can report.
#[derive(Debug)]
pub enum GatewayError {
    /// The requested row does not exist (e.g. unknown quiz id).
    NotFound(String),

    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    Network(String),

    /// The outbound record failed validation before the write was issued.
    Validation(String),

    /// The backend answered with a non-success status.
    Backend(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for GatewayError {}

/// Converts `reqwest::Error` into `GatewayError::Network`.
/// Allows using the `?` operator on gateway requests.
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Backend(err.to_string())
    }
}

/// Errors surfaced by the quiz session controller.
#[derive(Debug)]
pub enum SessionError {
    /// The quiz has zero questions; the attempt is not started.
    EmptyQuiz,

    /// Loading the quiz failed; the controller reverted to idle.
    Fetch(GatewayError),

    /// Saving the finalized attempt failed; the controller stays in
    /// `Submitting` and a manual re-submit retries the same record.
    Persist(GatewayError),

    /// `start_quiz` was called while an attempt is already underway.
    AlreadyActive,

    /// The answered question id does not belong to the current quiz.
    UnknownQuestion(i64),

    /// The operation is only valid while an attempt is in progress.
    NotInProgress,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for SessionError {}
