// src/catalog.rs

use std::sync::{Arc, Mutex};

use crate::error::GatewayError;
use crate::gateway::QuizGateway;
use crate::identity::StudentContext;
use crate::models::attempt::AttemptRecord;
use crate::models::quiz::QuizSummary;

/// One quiz-list entry: the quiz plus the student's standing on it.
#[derive(Debug, Clone)]
pub struct QuizOverview {
    pub summary: QuizSummary,

    /// Highest-percentage past attempt, when the student has any.
    pub best_attempt: Option<AttemptRecord>,

    pub attempts_taken: usize,
}

/// View-model behind the quiz list screen.
///
/// Results are cached until [`QuizCatalog::invalidate`] is called; the
/// presentation layer raises that signal when a finished attempt's
/// "return to quiz list" exit fires, instead of re-fetching on every
/// screen entry.
pub struct QuizCatalog {
    gateway: Arc<dyn QuizGateway>,
    student: StudentContext,
    cache: Mutex<Option<Vec<QuizOverview>>>,
}

impl QuizCatalog {
    pub fn new(gateway: Arc<dyn QuizGateway>, student: StudentContext) -> Self {
        Self {
            gateway,
            student,
            cache: Mutex::new(None),
        }
    }

    /// Returns the quiz list, fetching it only when the cache is empty.
    pub async fn overviews(&self) -> Result<Vec<QuizOverview>, GatewayError> {
        if let Some(cached) = self.cache.lock().unwrap().clone() {
            return Ok(cached);
        }

        let summaries = self.gateway.list_quizzes().await?;

        let mut overviews = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let attempts = self
                .gateway
                .fetch_past_attempts(&self.student.student_id, summary.id)
                .await?;
            let best_attempt = attempts.iter().max_by_key(|a| a.percentage).cloned();
            overviews.push(QuizOverview {
                summary,
                best_attempt,
                attempts_taken: attempts.len(),
            });
        }

        tracing::debug!("Quiz catalog refreshed: {} quizzes", overviews.len());
        *self.cache.lock().unwrap() = Some(overviews.clone());
        Ok(overviews)
    }

    /// Drops the cached list so the next read re-fetches. Raised after a
    /// finalized attempt so newly stored results show up.
    pub fn invalidate(&self) {
        self.cache.lock().unwrap().take();
    }
}
