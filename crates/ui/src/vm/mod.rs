mod quiz_vm;
mod text;

pub use quiz_vm::{QuizIntent, QuizVm};
pub use text::display_text;
