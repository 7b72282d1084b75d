use std::sync::Arc;

use services::QuizLoopService;

/// Services handed to the view tree by the composition root (`crates/app`).
#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(quiz_loop: Arc<QuizLoopService>) -> Self {
        Self { quiz_loop }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }
}
