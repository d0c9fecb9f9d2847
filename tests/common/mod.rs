// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use lms_client::error::GatewayError;
use lms_client::gateway::QuizGateway;
use lms_client::models::attempt::{AttemptRecord, NewAttempt};
use lms_client::models::quiz::{Question, Quiz, QuizSummary};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// In-memory gateway standing in for the hosted backend.
pub struct MockGateway {
    pub quizzes: Mutex<Vec<Quiz>>,
    pub persisted: Mutex<Vec<AttemptRecord>>,
    pub fail_fetch: AtomicBool,
    pub fail_persist: AtomicBool,
    pub list_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub persist_calls: AtomicUsize,
    /// When set, `fetch_quiz_with_questions` parks until a permit arrives,
    /// so tests can interleave other work with an in-flight fetch.
    pub fetch_gate: Option<Arc<Semaphore>>,
}

impl MockGateway {
    pub fn with_quizzes(quizzes: Vec<Quiz>) -> Self {
        Self {
            quizzes: Mutex::new(quizzes),
            persisted: Mutex::new(Vec::new()),
            fail_fetch: AtomicBool::new(false),
            fail_persist: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            persist_calls: AtomicUsize::new(0),
            fetch_gate: None,
        }
    }

    pub fn gated(quizzes: Vec<Quiz>, gate: Arc<Semaphore>) -> Self {
        Self {
            fetch_gate: Some(gate),
            ..Self::with_quizzes(quizzes)
        }
    }
}

#[async_trait]
impl QuizGateway for MockGateway {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let quizzes = self.quizzes.lock().unwrap();
        Ok(quizzes
            .iter()
            .map(|q| QuizSummary {
                id: q.id,
                title: q.title.clone(),
                question_count: q.questions.len() as u32,
                time_limit_minutes: q.time_limit_minutes,
                passing_threshold: q.passing_threshold,
            })
            .collect())
    }

    async fn fetch_quiz_with_questions(&self, quiz_id: i64) -> Result<Quiz, GatewayError> {
        if let Some(gate) = &self.fetch_gate {
            gate.acquire().await.expect("fetch gate closed").forget();
        }
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("connection refused".to_string()));
        }
        self.quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == quiz_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("Quiz {} not found", quiz_id)))
    }

    async fn persist_attempt(&self, record: NewAttempt) -> Result<AttemptRecord, GatewayError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("connection reset".to_string()));
        }
        let mut persisted = self.persisted.lock().unwrap();
        let stored = AttemptRecord {
            id: persisted.len() as i64 + 1,
            student_id: record.student_id,
            quiz_id: record.quiz_id,
            score: record.score,
            total_questions: record.total_questions,
            percentage: record.percentage,
            passed: record.passed,
            answers: record.answers,
            time_taken_seconds: record.time_taken_seconds,
            started_at: record.started_at,
            completed_at: record.completed_at,
            created_at: Some(Utc::now()),
        };
        persisted.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_past_attempts(
        &self,
        student_id: &str,
        quiz_id: i64,
    ) -> Result<Vec<AttemptRecord>, GatewayError> {
        Ok(self
            .persisted
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id && a.quiz_id == quiz_id)
            .cloned()
            .collect())
    }
}

pub fn question(id: i64, prompt: &str, options: &[&str], answer: &str) -> Question {
    Question {
        id,
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: answer.to_string(),
    }
}

/// Four single-choice questions with correct answers A, B, C, D.
pub fn four_question_quiz(id: i64) -> Quiz {
    Quiz {
        id,
        title: "Unit review".to_string(),
        time_limit_minutes: None,
        passing_threshold: None,
        questions: vec![
            question(1, "First?", &["A", "B", "C", "D"], "A"),
            question(2, "Second?", &["A", "B", "C", "D"], "B"),
            question(3, "Third?", &["A", "B", "C", "D"], "C"),
            question(4, "Fourth?", &["A", "B", "C", "D"], "D"),
        ],
    }
}

pub fn empty_quiz(id: i64) -> Quiz {
    Quiz {
        id,
        title: "Draft quiz".to_string(),
        time_limit_minutes: None,
        passing_threshold: None,
        questions: Vec::new(),
    }
}
