// tests/catalog_tests.rs

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use lms_client::catalog::QuizCatalog;
use lms_client::identity::StudentContext;
use lms_client::session::QuizSession;

use common::{MockGateway, four_question_quiz, init_tracing};

#[tokio::test]
async fn overviews_are_cached_until_invalidated() {
    // Arrange
    init_tracing();
    let gateway = Arc::new(MockGateway::with_quizzes(vec![four_question_quiz(7)]));
    let student = StudentContext::new("student-1");
    let catalog = QuizCatalog::new(gateway.clone(), student);

    // Act
    catalog.overviews().await.expect("first read");
    catalog.overviews().await.expect("cached read");
    assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 1);

    catalog.invalidate();
    catalog.overviews().await.expect("read after invalidation");

    // Assert
    assert_eq!(gateway.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn best_attempt_surfaces_the_highest_percentage() {
    init_tracing();
    let gateway = Arc::new(MockGateway::with_quizzes(vec![four_question_quiz(7)]));
    let student = StudentContext::new("student-1");

    // Two finalized attempts: 1/4 first, then 3/4.
    let weaker = QuizSession::new(gateway.clone(), student.clone());
    weaker.start_quiz(7).await.expect("start");
    weaker.select_answer(1, "A").expect("select");
    weaker.submit(false).await.expect("submit");

    let stronger = QuizSession::new(gateway.clone(), student.clone());
    stronger.start_quiz(7).await.expect("start");
    stronger.select_answer(1, "A").expect("select");
    stronger.select_answer(2, "B").expect("select");
    stronger.select_answer(3, "C").expect("select");
    stronger.submit(false).await.expect("submit");

    let catalog = QuizCatalog::new(gateway, student);
    let overviews = catalog.overviews().await.expect("overviews");

    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].attempts_taken, 2);
    let best = overviews[0].best_attempt.as_ref().expect("a best attempt");
    assert_eq!(best.score, 3);
    assert_eq!(best.percentage, 75);
}

#[tokio::test]
async fn quizzes_without_attempts_have_no_best_score() {
    init_tracing();
    let gateway = Arc::new(MockGateway::with_quizzes(vec![four_question_quiz(7)]));
    let catalog = QuizCatalog::new(gateway, StudentContext::new("student-1"));

    let overviews = catalog.overviews().await.expect("overviews");

    assert_eq!(overviews.len(), 1);
    assert!(overviews[0].best_attempt.is_none());
    assert_eq!(overviews[0].attempts_taken, 0);
}

#[tokio::test]
async fn attempts_by_other_students_do_not_leak_into_the_overview() {
    init_tracing();
    let gateway = Arc::new(MockGateway::with_quizzes(vec![four_question_quiz(7)]));

    let other = QuizSession::new(gateway.clone(), StudentContext::new("student-2"));
    other.start_quiz(7).await.expect("start");
    other.select_answer(1, "A").expect("select");
    other.submit(false).await.expect("submit");

    let catalog = QuizCatalog::new(gateway, StudentContext::new("student-1"));
    let overviews = catalog.overviews().await.expect("overviews");

    assert!(overviews[0].best_attempt.is_none());
    assert_eq!(overviews[0].attempts_taken, 0);
}
