// src/gateway/rest.rs

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use url::Url;
use validator::Validate;

use crate::config::Config;
use crate::error::GatewayError;
use crate::gateway::QuizGateway;
use crate::models::attempt::{AttemptRecord, NewAttempt};
use crate::models::quiz::{Quiz, QuizSummary};

/// Gateway over the hosted table store's REST interface.
///
/// Tables are exposed PostgREST-style under `/rest/v1/<table>`, with filters
/// as query parameters (`id=eq.7`) and related rows embedded through the
/// `select` parameter (`*,questions(*)`). Every request carries the project
/// API key; row-level authorization is enforced by the backend, not here.
pub struct RestGateway {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RestGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.backend_url)
            .map_err(|e| GatewayError::Backend(format!("Invalid backend URL: {}", e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| GatewayError::Backend(format!("Invalid table URL: {}", e)))
    }

    /// Attaches the project API key headers required by the hosted backend.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Maps a non-success response to a typed error, consuming the body
    /// for the log line.
    async fn check(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("{} failed with status {}: {}", context, status, body);

        match status {
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(context.to_string())),
            _ => Err(GatewayError::Backend(format!(
                "{} returned status {}",
                context, status
            ))),
        }
    }
}

#[async_trait]
impl QuizGateway for RestGateway {
    async fn list_quizzes(&self) -> Result<Vec<QuizSummary>, GatewayError> {
        // `quiz_summaries` is a backend view joining quizzes with their
        // question counts, so the list screen never pulls question bodies.
        let url = self.table_url("quiz_summaries")?;

        let response = self
            .authed(self.client.get(url))
            .query(&[("select", "*"), ("order", "title.asc")])
            .send()
            .await?;

        let summaries = Self::check(response, "list_quizzes")
            .await?
            .json::<Vec<QuizSummary>>()
            .await?;

        Ok(summaries)
    }

    async fn fetch_quiz_with_questions(&self, quiz_id: i64) -> Result<Quiz, GatewayError> {
        let url = self.table_url("quizzes")?;

        let response = self
            .authed(self.client.get(url))
            .query(&[
                ("select", "*,questions(*)".to_string()),
                ("id", format!("eq.{}", quiz_id)),
            ])
            .send()
            .await?;

        // Filters return an array; an unknown id is simply an empty one.
        let mut rows = Self::check(response, "fetch_quiz_with_questions")
            .await?
            .json::<Vec<Quiz>>()
            .await?;

        match rows.pop() {
            Some(quiz) => Ok(quiz),
            None => Err(GatewayError::NotFound(format!("Quiz {} not found", quiz_id))),
        }
    }

    async fn persist_attempt(&self, record: NewAttempt) -> Result<AttemptRecord, GatewayError> {
        record
            .validate()
            .map_err(|e| GatewayError::Validation(e.to_string()))?;

        let url = self.table_url("quiz_attempts")?;

        let response = self
            .authed(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        let mut rows = Self::check(response, "persist_attempt")
            .await?
            .json::<Vec<AttemptRecord>>()
            .await?;

        rows.pop().ok_or_else(|| {
            GatewayError::Backend("persist_attempt returned no row".to_string())
        })
    }

    async fn fetch_past_attempts(
        &self,
        student_id: &str,
        quiz_id: i64,
    ) -> Result<Vec<AttemptRecord>, GatewayError> {
        let url = self.table_url("quiz_attempts")?;

        let response = self
            .authed(self.client.get(url))
            .query(&[
                ("select", "*".to_string()),
                ("student_id", format!("eq.{}", student_id)),
                ("quiz_id", format!("eq.{}", quiz_id)),
                ("order", "completed_at.desc".to_string()),
            ])
            .send()
            .await?;

        let attempts = Self::check(response, "fetch_past_attempts")
            .await?
            .json::<Vec<AttemptRecord>>()
            .await?;

        Ok(attempts)
    }
}
