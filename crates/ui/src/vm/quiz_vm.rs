use chrono::{DateTime, Utc};
use log::{error, warn};
use tokio::sync::watch;

use services::{
    CountdownTimer, LoadOutcome, QuizError, QuizLoopService, QuizSession, SessionToken,
    TimeoutOutcome,
};
use trivia_core::model::Question;

/// Input events accepted from the rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Answer(String),
    RevealHint,
}

/// View model owning the session state machine and the countdown for the
/// current game.
///
/// The countdown lives and dies with the session: a new game replaces the
/// timer field, which disposes the old ticker before the new one exists, so
/// no orphaned countdown can ever signal against the wrong session.
pub struct QuizVm {
    session: QuizSession,
    timer: Option<CountdownTimer>,
}

impl QuizVm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: QuizSession::new(),
            timer: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// First step of a new game. Disposes any countdown still running for
    /// the previous session, then marks the session loading.
    pub fn begin_loading(&mut self) -> SessionToken {
        self.timer = None;
        self.session.begin_loading()
    }

    /// Second step: resolve the fetch this view started. On success the
    /// session activates and gets a fresh countdown budgeted by the service.
    /// Returns `true` when the session started.
    pub fn resolve_load(
        &mut self,
        token: SessionToken,
        fetched: Result<Vec<Question>, QuizError>,
        service: &QuizLoopService,
    ) -> bool {
        match fetched {
            Ok(questions) => {
                match self
                    .session
                    .complete_load(token, questions, service.clock().now())
                {
                    LoadOutcome::Started => {
                        let budget = service.time_budget(self.session.total_questions());
                        self.timer = Some(CountdownTimer::start(budget));
                        true
                    }
                    LoadOutcome::Failed => false,
                    LoadOutcome::Superseded => {
                        warn!("quiz batch discarded: superseded by a newer start");
                        false
                    }
                }
            }
            Err(err) => {
                error!("quiz load failed: {err}");
                self.session.fail_load(token);
                false
            }
        }
    }

    /// Score a click against the current question. Out-of-state clicks are
    /// a page bug: logged and dropped, never fatal.
    pub fn submit_answer(&mut self, choice: &str, now: DateTime<Utc>) {
        match self.session.submit_answer(choice, now) {
            Ok(outcome) => {
                if outcome.finished {
                    self.timer = None;
                }
            }
            Err(QuizError::InvalidTransition) => {
                warn!("answer ignored: session no longer accepts input");
            }
            Err(err) => warn!("answer ignored: {err}"),
        }
    }

    pub fn reveal_hint(&mut self) {
        if self.session.reveal_hint().is_err() {
            warn!("hint request ignored: session is not active");
        }
    }

    /// Forward a countdown expiry carrying the token of the session it was
    /// created for. Stale signals come back `Ignored`.
    pub fn handle_timeout(&mut self, token: SessionToken, now: DateTime<Utc>) -> TimeoutOutcome {
        let outcome = self.session.handle_timeout(token, now);
        if outcome == TimeoutOutcome::Finished {
            self.timer = None;
        }
        outcome
    }

    /// Watch the live countdown, if one is running.
    #[must_use]
    pub fn subscribe_timer(&self) -> Option<watch::Receiver<u32>> {
        self.timer.as_ref().map(CountdownTimer::subscribe)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.as_ref().map(CountdownTimer::remaining_seconds)
    }
}

impl Default for QuizVm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use services::{FetchError, QuestionSource, QuizStatus};
    use trivia_core::model::{Difficulty, RawQuestion};
    use trivia_core::time::fixed_clock;

    struct UnusedSource;

    #[async_trait::async_trait]
    impl QuestionSource for UnusedSource {
        async fn fetch_questions(&self, _amount: u8) -> Result<Vec<RawQuestion>, FetchError> {
            unreachable!("the vm is fed batches directly in these tests");
        }
    }

    fn service() -> QuizLoopService {
        QuizLoopService::new(fixed_clock(), Arc::new(UnusedSource))
    }

    fn question(correct: &str) -> Question {
        let raw = RawQuestion {
            category: "History".to_string(),
            difficulty: Difficulty::Easy,
            question: format!("Which one is {correct}?"),
            correct_answer: correct.to_string(),
            incorrect_answers: vec!["other".to_string()],
        };
        let choices = vec![correct.to_string(), "other".to_string()];
        Question::new(raw, choices).unwrap()
    }

    #[tokio::test]
    async fn successful_load_attaches_a_countdown() {
        let service = service();
        let mut vm = QuizVm::new();

        let token = vm.begin_loading();
        assert!(vm.resolve_load(token, Ok(vec![question("Paris")]), &service));

        assert_eq!(vm.session().status(), QuizStatus::Active);
        // Default config: one question at ten seconds each.
        assert_eq!(vm.remaining_seconds(), Some(10));
    }

    #[tokio::test]
    async fn failed_load_leaves_no_countdown() {
        let service = service();
        let mut vm = QuizVm::new();

        let token = vm.begin_loading();
        assert!(!vm.resolve_load(
            token,
            Err(QuizError::Fetch(FetchError::EmptyBatch)),
            &service
        ));

        assert_eq!(vm.session().status(), QuizStatus::Error);
        assert!(vm.remaining_seconds().is_none());
    }

    #[tokio::test]
    async fn finishing_the_quiz_drops_the_countdown() {
        let service = service();
        let mut vm = QuizVm::new();

        let token = vm.begin_loading();
        vm.resolve_load(token, Ok(vec![question("Paris")]), &service);
        vm.submit_answer("Paris", service.clock().now());

        assert_eq!(vm.session().status(), QuizStatus::Finished);
        assert_eq!(vm.session().score(), 1);
        assert!(vm.remaining_seconds().is_none());
    }

    #[tokio::test]
    async fn restart_replaces_session_and_countdown() {
        let service = service();
        let mut vm = QuizVm::new();

        let first = vm.begin_loading();
        vm.resolve_load(first, Ok(vec![question("Paris")]), &service);
        let stale = vm.session().token();

        let second = vm.begin_loading();
        assert!(vm.remaining_seconds().is_none());
        vm.resolve_load(second, Ok(vec![question("Mars")]), &service);

        // The old session's countdown expiring now must change nothing.
        assert_eq!(
            vm.handle_timeout(stale, service.clock().now()),
            TimeoutOutcome::Ignored
        );
        assert_eq!(vm.session().status(), QuizStatus::Active);
        assert!(vm.remaining_seconds().is_some());
    }

    #[tokio::test]
    async fn out_of_state_input_is_dropped_quietly() {
        let mut vm = QuizVm::new();
        vm.submit_answer("Paris", fixed_clock().now());
        vm.reveal_hint();
        assert_eq!(vm.session().status(), QuizStatus::Idle);
        assert_eq!(vm.session().score(), 0);
    }
}
