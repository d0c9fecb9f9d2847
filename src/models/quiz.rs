// src/models/quiz.rs

use serde::{Deserialize, Serialize};

/// Fallback time limit applied when a quiz does not specify one.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

/// Fallback passing threshold (percent) when a quiz does not specify one.
pub const DEFAULT_PASSING_THRESHOLD: u32 = 50;

/// A quiz row together with its full ordered question list.
/// Immutable for the duration of an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,

    pub title: String,

    /// Time limit in minutes. `None` means the default applies.
    pub time_limit_minutes: Option<u32>,

    /// Passing threshold as a percentage. `None` means the default applies.
    pub passing_threshold: Option<u32>,

    /// Ordered question list, embedded by the quiz fetch.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES)
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_minutes() * 60
    }

    pub fn passing_threshold(&self) -> u32 {
        self.passing_threshold.unwrap_or(DEFAULT_PASSING_THRESHOLD)
    }

    /// Looks up a question by id within this quiz.
    pub fn question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// A single question owned by exactly one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text shown to the student.
    pub prompt: String,

    /// Option strings as stored. Authoring tools leave blank slots behind,
    /// so the display path goes through [`Question::display_options`].
    pub options: Vec<String>,

    /// The correct option VALUE. Grading compares the selected string
    /// against this by exact equality, never by index.
    pub answer: String,
}

impl Question {
    /// Options with blank entries filtered out, in stored order.
    pub fn display_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(|o| o.as_str())
            .filter(|o| !o.trim().is_empty())
            .collect()
    }
}

/// List-view projection of a quiz, without its questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub question_count: u32,
    pub time_limit_minutes: Option<u32>,
    pub passing_threshold: Option<u32>,
}
