// src/session/mod.rs

pub mod score;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::gateway::QuizGateway;
use crate::identity::StudentContext;
use crate::models::attempt::{AttemptRecord, NewAttempt};
use crate::models::quiz::{Question, Quiz};

/// Where the controller stands in the attempt lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No attempt in progress (quiz list view).
    Idle,
    /// Fetching the quiz and its questions.
    Loading,
    /// Timer running; navigation and answering allowed.
    InProgress,
    /// Finalization underway; further input is blocked.
    Submitting,
    /// Result computed and persisted.
    Completed,
}

/// Outcome of a `submit` call.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The attempt was scored and persisted by this call.
    Completed(AttemptRecord),

    /// Another submission already moved the attempt out of `InProgress`;
    /// this call did nothing.
    AlreadySettled,
}

/// Read-only snapshot of the controller for rendering.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub quiz_title: Option<String>,
    pub current_index: usize,
    pub question_count: usize,
    pub current_question: Option<Question>,
    pub selections: HashMap<i64, String>,
    pub remaining_seconds: u32,
    pub result: Option<AttemptRecord>,
}

struct SessionState {
    phase: SessionPhase,
    /// Bumped whenever the current attempt is discarded, so a network
    /// response that comes back afterwards can be recognized as stale.
    epoch: u64,
    quiz: Option<Quiz>,
    current_index: usize,
    selections: HashMap<i64, String>,
    remaining_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    /// Draft retained after a failed persist; a manual re-submit sends it
    /// again without re-scoring.
    pending: Option<NewAttempt>,
    result: Option<AttemptRecord>,
}

struct SessionInner {
    gateway: Arc<dyn QuizGateway>,
    student: StudentContext,
    state: Mutex<SessionState>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

/// Drives one timed quiz attempt from start to finalized result.
///
/// Cheap to clone; all clones share one attempt. Everything between the
/// question fetch and the attempt write happens locally: answering and
/// navigating never touch the network.
#[derive(Clone)]
pub struct QuizSession {
    inner: Arc<SessionInner>,
}

impl QuizSession {
    pub fn new(gateway: Arc<dyn QuizGateway>, student: StudentContext) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                gateway,
                student,
                state: Mutex::new(SessionState {
                    phase: SessionPhase::Idle,
                    epoch: 0,
                    quiz: None,
                    current_index: 0,
                    selections: HashMap::new(),
                    remaining_seconds: 0,
                    started_at: None,
                    pending: None,
                    result: None,
                }),
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.lock().unwrap().phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.inner.state.lock().unwrap().remaining_seconds
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> SessionView {
        let state = self.inner.state.lock().unwrap();
        SessionView {
            phase: state.phase,
            quiz_title: state.quiz.as_ref().map(|q| q.title.clone()),
            current_index: state.current_index,
            question_count: state.quiz.as_ref().map_or(0, |q| q.questions.len()),
            current_question: state
                .quiz
                .as_ref()
                .and_then(|q| q.questions.get(state.current_index))
                .cloned(),
            selections: state.selections.clone(),
            remaining_seconds: state.remaining_seconds,
            result: state.result.clone(),
        }
    }

    /// Fetches the quiz and starts the timed attempt.
    ///
    /// Rejects quizzes with zero questions without any state change beyond
    /// reverting to `Idle`. On success the countdown starts at
    /// `time_limit_minutes * 60` and the first question is shown.
    pub async fn start_quiz(&self, quiz_id: i64) -> Result<(), SessionError> {
        let my_epoch = {
            let mut state = self.inner.state.lock().unwrap();
            if state.phase != SessionPhase::Idle {
                return Err(SessionError::AlreadyActive);
            }
            state.phase = SessionPhase::Loading;
            state.epoch += 1;
            state.epoch
        };

        let fetched = self.inner.gateway.fetch_quiz_with_questions(quiz_id).await;

        let mut state = self.inner.state.lock().unwrap();
        if state.epoch != my_epoch || state.phase != SessionPhase::Loading {
            // The student navigated away while the fetch was in flight.
            tracing::debug!("Discarding stale quiz fetch for quiz {}", quiz_id);
            return Ok(());
        }

        let quiz = match fetched {
            Ok(quiz) => quiz,
            Err(e) => {
                tracing::error!("Failed to load quiz {}: {}", quiz_id, e);
                state.phase = SessionPhase::Idle;
                return Err(SessionError::Fetch(e));
            }
        };

        if quiz.questions.is_empty() {
            tracing::warn!("Quiz {} has no questions; attempt not started", quiz_id);
            state.phase = SessionPhase::Idle;
            return Err(SessionError::EmptyQuiz);
        }

        tracing::info!(
            "Starting quiz {} ({} questions, {} min limit)",
            quiz.id,
            quiz.questions.len(),
            quiz.time_limit_minutes()
        );

        state.remaining_seconds = quiz.time_limit_seconds();
        state.current_index = 0;
        state.selections.clear();
        state.started_at = Some(Utc::now());
        state.pending = None;
        state.result = None;
        state.quiz = Some(quiz);
        state.phase = SessionPhase::InProgress;
        drop(state);

        self.spawn_countdown(my_epoch);
        Ok(())
    }

    /// Records the student's selection for a question, overwriting any
    /// prior one. The option value is taken as-is; only the question id is
    /// checked to belong to the current quiz.
    pub fn select_answer(
        &self,
        question_id: i64,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        let mut state = self.inner.state.lock().unwrap();
        if state.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let known = state
            .quiz
            .as_ref()
            .is_some_and(|q| q.question(question_id).is_some());
        if !known {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        state.selections.insert(question_id, option.into());
        Ok(())
    }

    /// Jumps to a question by index, clamped to the question list.
    pub fn go_to_question(&self, index: usize) -> Result<usize, SessionError> {
        let mut state = self.inner.state.lock().unwrap();
        if state.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        let count = state.quiz.as_ref().map_or(0, |q| q.questions.len());
        state.current_index = index.min(count.saturating_sub(1));
        Ok(state.current_index)
    }

    pub fn next(&self) -> Result<usize, SessionError> {
        let current = {
            let state = self.inner.state.lock().unwrap();
            if state.phase != SessionPhase::InProgress {
                return Err(SessionError::NotInProgress);
            }
            state.current_index
        };
        self.go_to_question(current + 1)
    }

    pub fn previous(&self) -> Result<usize, SessionError> {
        let current = {
            let state = self.inner.state.lock().unwrap();
            if state.phase != SessionPhase::InProgress {
                return Err(SessionError::NotInProgress);
            }
            state.current_index
        };
        self.go_to_question(current.saturating_sub(1))
    }

    /// Finalizes the attempt: stops the countdown, grades once, persists.
    ///
    /// `automatic` marks a countdown-expiry submission; a manual call must
    /// only be made after the student confirmed. Once a submission has moved
    /// the attempt out of `InProgress`, later calls return
    /// [`SubmitOutcome::AlreadySettled`] without a second grading pass or a
    /// second write. After a persist failure the controller stays in
    /// `Submitting` and a manual call retries the retained record.
    pub async fn submit(&self, automatic: bool) -> Result<SubmitOutcome, SessionError> {
        let (draft, my_epoch) = {
            let mut state = self.inner.state.lock().unwrap();
            let my_epoch = state.epoch;
            match state.phase {
                SessionPhase::InProgress => {
                    let Some(quiz) = state.quiz.as_ref() else {
                        return Err(SessionError::NotInProgress);
                    };
                    let summary = score::grade(quiz, &state.selections);
                    let time_taken =
                        quiz.time_limit_seconds().saturating_sub(state.remaining_seconds);
                    let draft = NewAttempt {
                        student_id: self.inner.student.student_id.clone(),
                        quiz_id: quiz.id,
                        score: summary.correct_count,
                        total_questions: summary.total_questions,
                        percentage: summary.percentage,
                        passed: summary.passed,
                        answers: summary.answers,
                        time_taken_seconds: time_taken,
                        started_at: state.started_at.unwrap_or_else(Utc::now),
                        completed_at: Utc::now(),
                    };
                    tracing::info!(
                        "Submitting quiz {} ({}): {}/{} correct",
                        quiz.id,
                        if automatic { "time expired" } else { "manual" },
                        summary.correct_count,
                        summary.total_questions
                    );
                    state.phase = SessionPhase::Submitting;
                    (draft, my_epoch)
                }
                SessionPhase::Submitting => {
                    if automatic {
                        return Ok(SubmitOutcome::AlreadySettled);
                    }
                    // A retained draft means the previous persist failed and
                    // this is the student's retry. No draft means a persist
                    // is still in flight.
                    match state.pending.take() {
                        Some(draft) => (draft, my_epoch),
                        None => return Ok(SubmitOutcome::AlreadySettled),
                    }
                }
                SessionPhase::Completed => return Ok(SubmitOutcome::AlreadySettled),
                SessionPhase::Idle | SessionPhase::Loading => {
                    return Err(SessionError::NotInProgress);
                }
            }
        };

        self.stop_countdown();

        let persisted = self.inner.gateway.persist_attempt(draft.clone()).await;

        let mut state = self.inner.state.lock().unwrap();
        if state.epoch != my_epoch {
            tracing::debug!("Discarding persist response for a departed attempt");
            return Ok(SubmitOutcome::AlreadySettled);
        }

        match persisted {
            Ok(record) => {
                state.phase = SessionPhase::Completed;
                state.pending = None;
                state.result = Some(record.clone());
                Ok(SubmitOutcome::Completed(record))
            }
            Err(e) => {
                tracing::error!("Failed to save attempt for quiz {}: {}", draft.quiz_id, e);
                state.pending = Some(draft);
                Err(SessionError::Persist(e))
            }
        }
    }

    /// Discards the attempt and returns to `Idle`.
    ///
    /// The caller is responsible for any leave-confirmation prompt. Cancels
    /// the countdown and invalidates in-flight responses, which are then
    /// dropped silently when they arrive.
    pub fn abandon(&self) {
        self.stop_countdown();
        let mut state = self.inner.state.lock().unwrap();
        if state.phase != SessionPhase::Idle {
            tracing::info!("Abandoning attempt in phase {:?}", state.phase);
        }
        state.epoch += 1;
        state.phase = SessionPhase::Idle;
        state.quiz = None;
        state.current_index = 0;
        state.selections.clear();
        state.remaining_seconds = 0;
        state.started_at = None;
        state.pending = None;
        state.result = None;
    }

    fn stop_countdown(&self) {
        if let Some(handle) = self.inner.timer.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Spawns the 1 Hz countdown for the attempt identified by `epoch`.
    ///
    /// The task holds only a weak reference, so dropping the last session
    /// handle ends it; it also exits on its own as soon as the attempt it
    /// was started for is no longer in progress. On expiry it removes its
    /// own join handle before submitting, so the submission is not aborted
    /// from under itself.
    fn spawn_countdown(&self, epoch: u64) {
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let expired = {
                    let mut state = inner.state.lock().unwrap();
                    if state.phase != SessionPhase::InProgress || state.epoch != epoch {
                        break;
                    }
                    state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
                    state.remaining_seconds == 0
                };
                if expired {
                    inner.timer.lock().unwrap().take();
                    let session = QuizSession { inner };
                    if let Err(e) = session.submit(true).await {
                        tracing::error!("Automatic submission failed: {}", e);
                    }
                    break;
                }
            }
        });
        *self.inner.timer.lock().unwrap() = Some(handle);
    }
}
