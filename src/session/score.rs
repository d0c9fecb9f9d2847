// src/session/score.rs

use std::collections::HashMap;

use crate::models::attempt::AnswerReview;
use crate::models::quiz::Quiz;

/// Result of one grading pass over a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    /// Count of correctly answered questions.
    pub correct_count: u32,

    pub total_questions: u32,

    /// Rounded percentage; 0 when the quiz has no questions.
    pub percentage: u32,

    pub passed: bool,

    /// Review row for every question in the quiz, answered or not.
    pub answers: HashMap<i64, AnswerReview>,
}

/// Grades an attempt against the quiz's full question list.
///
/// Iterates every question, not just the answered ones, so an unanswered
/// question counts as incorrect. Comparison is exact string equality
/// against the question's correct option value.
pub fn grade(quiz: &Quiz, selections: &HashMap<i64, String>) -> ScoreSummary {
    let mut correct_count: u32 = 0;
    let mut answers = HashMap::with_capacity(quiz.questions.len());

    for question in &quiz.questions {
        let selected = selections.get(&question.id).cloned();
        let is_correct = selected.as_deref() == Some(question.answer.as_str());

        if is_correct {
            correct_count += 1;
        }

        answers.insert(
            question.id,
            AnswerReview {
                selected,
                correct: question.answer.clone(),
                is_correct,
            },
        );
    }

    let total_questions = quiz.questions.len() as u32;
    let percentage = if total_questions > 0 {
        (correct_count as f64 / total_questions as f64 * 100.0).round() as u32
    } else {
        0
    };
    let passed = percentage >= quiz.passing_threshold();

    ScoreSummary {
        correct_count,
        total_questions,
        percentage,
        passed,
        answers,
    }
}
