/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the question currently shown.
    pub position: usize,
    pub total: usize,
    pub score: u32,
    pub is_finished: bool,
}
