use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use services::{
    CountdownTimer, FetchError, QuestionSource, QuizConfig, QuizLoopService, QuizSession,
    QuizStatus, TimeoutOutcome,
};
use trivia_core::model::{Difficulty, RawQuestion};
use trivia_core::time::fixed_clock;

fn raw_question(correct: &str, incorrect: &[&str]) -> RawQuestion {
    RawQuestion {
        category: "General Knowledge".to_string(),
        difficulty: Difficulty::Easy,
        question: format!("Which one is {correct}?"),
        correct_answer: correct.to_string(),
        incorrect_answers: incorrect.iter().map(ToString::to_string).collect(),
    }
}

/// Source that fails a configured number of times, then serves its batch.
struct ScriptedSource {
    failures_left: AtomicUsize,
    batch: Vec<RawQuestion>,
}

impl ScriptedSource {
    fn serving(batch: Vec<RawQuestion>) -> Self {
        Self {
            failures_left: AtomicUsize::new(0),
            batch,
        }
    }

    fn failing_once_then(batch: Vec<RawQuestion>) -> Self {
        Self {
            failures_left: AtomicUsize::new(1),
            batch,
        }
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn fetch_questions(&self, _amount: u8) -> Result<Vec<RawQuestion>, FetchError> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok()
        {
            return Err(FetchError::EmptyBatch);
        }
        Ok(self.batch.clone())
    }
}

fn quiz_service(source: ScriptedSource) -> QuizLoopService {
    QuizLoopService::new(fixed_clock(), Arc::new(source)).with_config(QuizConfig {
        batch_size: 2,
        seconds_per_question: 10,
        ..QuizConfig::default()
    })
}

#[tokio::test]
async fn full_run_scores_answers_and_finishes() {
    let service = quiz_service(ScriptedSource::serving(vec![
        raw_question("Paris", &["London", "Rome", "Berlin"]),
        raw_question("Mars", &["Venus", "Jupiter", "Saturn"]),
    ]));
    let mut session = QuizSession::new();

    service.start(&mut session).await.unwrap();
    assert_eq!(session.status(), QuizStatus::Active);
    assert_eq!(session.total_questions(), 2);

    // Each ingested question carries all four answers in some order.
    let first = session.current_question().unwrap();
    assert_eq!(first.answer_choices().len(), 4);
    assert!(first.answer_choices().iter().any(|choice| choice == "Paris"));

    let correct = session.current_question().unwrap().correct_answer().to_string();
    let outcome = session.submit_answer(&correct, service.clock().now()).unwrap();
    assert!(outcome.correct);
    assert!(!outcome.finished);

    let outcome = session.submit_answer("wrong", service.clock().now()).unwrap();
    assert!(!outcome.correct);
    assert!(outcome.finished);

    assert_eq!(session.status(), QuizStatus::Finished);
    assert_eq!(session.score(), 1);
    assert_eq!(session.total_questions(), 0);
}

#[tokio::test]
async fn failed_fetch_surfaces_error_and_retry_recovers() {
    let service = quiz_service(ScriptedSource::failing_once_then(vec![raw_question(
        "Paris",
        &["London"],
    )]));
    let mut session = QuizSession::new();

    let err = service.start(&mut session).await.unwrap_err();
    assert!(matches!(err, services::QuizError::Fetch(_)));
    assert_eq!(session.status(), QuizStatus::Error);
    assert_eq!(session.total_questions(), 0);

    service.start(&mut session).await.unwrap();
    assert_eq!(session.status(), QuizStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_finishes_the_session() {
    let service = quiz_service(ScriptedSource::serving(vec![raw_question(
        "Paris",
        &["London"],
    )]));
    let mut session = QuizSession::new();
    service.start(&mut session).await.unwrap();

    let budget = service.time_budget(session.total_questions());
    assert_eq!(budget, 10);

    let token = session.token();
    let timer = CountdownTimer::start(budget);
    assert!(timer.timed_out().await);

    assert_eq!(
        session.handle_timeout(token, service.clock().now()),
        TimeoutOutcome::Finished
    );
    assert_eq!(session.status(), QuizStatus::Finished);
    assert_eq!(session.score(), 0);
}

#[tokio::test(start_paused = true)]
async fn restarting_disposes_the_old_countdown() {
    let service = quiz_service(ScriptedSource::serving(vec![raw_question(
        "Paris",
        &["London"],
    )]));
    let mut session = QuizSession::new();
    service.start(&mut session).await.unwrap();

    let old_token = session.token();
    let mut old_timer = CountdownTimer::start(service.time_budget(1));

    // New game: the old timer is disposed before a new one is created.
    old_timer.dispose();
    service.start(&mut session).await.unwrap();

    assert!(!old_timer.timed_out().await);
    assert_eq!(
        session.handle_timeout(old_token, service.clock().now()),
        TimeoutOutcome::Ignored
    );
    assert_eq!(session.status(), QuizStatus::Active);
}
