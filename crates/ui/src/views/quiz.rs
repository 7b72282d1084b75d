use std::sync::Arc;

use dioxus::prelude::*;

use services::{QuizStatus, TimeoutOutcome, format_mm_ss};

use crate::context::AppContext;
use crate::vm::{QuizIntent, QuizVm, display_text};

/// Owned, display-ready copy of the question being shown. Everything here
/// has already been through `display_text`, except the raw answer strings
/// that go back into `submit_answer` for exact matching.
struct QuestionDisplay {
    counter: String,
    category: String,
    difficulty: String,
    text: String,
    choices: Vec<String>,
    correct: String,
    hint_revealed: bool,
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let vm = use_signal(QuizVm::new);
    let remaining = use_signal(|| None::<u32>);

    let dispatch_intent = {
        let quiz_loop = ctx.quiz_loop();
        use_callback(move |intent: QuizIntent| {
            let quiz_loop = Arc::clone(&quiz_loop);
            let mut vm = vm;
            let mut remaining = remaining;

            match intent {
                QuizIntent::Start => {
                    spawn(async move {
                        let token = vm.write().begin_loading();
                        remaining.set(None);

                        let fetched = quiz_loop.fetch_batch().await;
                        if !vm.write().resolve_load(token, fetched, &quiz_loop) {
                            return;
                        }
                        let Some(mut ticks) = vm.read().subscribe_timer() else {
                            return;
                        };
                        let clock = quiz_loop.clock();

                        // One watcher drives both the readout and the expiry
                        // signal, so the label can never disagree with the
                        // timeout that ends the game.
                        spawn(async move {
                            loop {
                                let left = *ticks.borrow();
                                remaining.set(Some(left));
                                if left == 0 {
                                    if vm.write().handle_timeout(token, clock.now())
                                        == TimeoutOutcome::Finished
                                    {
                                        remaining.set(None);
                                    }
                                    return;
                                }
                                if ticks.changed().await.is_err() {
                                    return;
                                }
                            }
                        });
                    });
                }
                QuizIntent::Answer(choice) => {
                    vm.write().submit_answer(&choice, quiz_loop.clock().now());
                }
                QuizIntent::RevealHint => {
                    vm.write().reveal_hint();
                }
            }
        })
    };

    let vm_guard = vm.read();
    let session = vm_guard.session();
    let status = session.status();
    let progress = session.progress();
    let score_label = format!("Score: {}", progress.score);
    let timer_label = (*remaining.read()).map(format_mm_ss);
    let question_display = session.current_question().map(|question| QuestionDisplay {
        counter: format!("Question: {}/{}", progress.position, progress.total),
        category: display_text(question.category()),
        difficulty: question.difficulty().to_string(),
        text: display_text(question.text()),
        choices: question.answer_choices().to_vec(),
        correct: display_text(question.correct_answer()),
        hint_revealed: session.hint_revealed(),
    });

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h1 { "Trivia" }
            }
            match status {
                QuizStatus::Idle => rsx! {
                    section { class: "quiz-splash",
                        p { "Ten questions, one countdown. Ready?" }
                        StartButton { label: "Start new game", on_intent: dispatch_intent }
                    }
                },
                QuizStatus::Loading => rsx! {
                    p { class: "quiz-loading", "Loading quiz questions..." }
                },
                QuizStatus::Error => rsx! {
                    section { class: "quiz-error",
                        p { "Could not load questions. Check your connection and try again." }
                        StartButton { label: "Retry", on_intent: dispatch_intent }
                    }
                },
                QuizStatus::Active => rsx! {
                    if let Some(display) = question_display {
                        section { class: "quiz-question",
                            div { class: "quiz-meta",
                                h2 { "{display.counter}" }
                                h3 { "{score_label}" }
                                p { "Category: {display.category}" }
                                p { "Difficulty: {display.difficulty}" }
                            }
                            p { class: "quiz-text", "{display.text}" }
                            div { class: "quiz-choices",
                                for choice in display.choices.clone() {
                                    AnswerButton { choice, on_intent: dispatch_intent }
                                }
                            }
                            hr {}
                            if display.hint_revealed {
                                p { class: "quiz-hint", "Correct answer: {display.correct}" }
                            } else {
                                button {
                                    class: "btn btn-hint",
                                    r#type: "button",
                                    onclick: move |_| dispatch_intent.call(QuizIntent::RevealHint),
                                    "Show answer"
                                }
                            }
                            if let Some(label) = timer_label {
                                p { class: "quiz-timer", "Time remaining: {label}" }
                            }
                        }
                    }
                },
                QuizStatus::Finished => rsx! {
                    section { class: "quiz-complete",
                        h2 { "Game over" }
                        p { "Final score: {progress.score}" }
                        StartButton { label: "Start new game", on_intent: dispatch_intent }
                    }
                },
            }
        }
    }
}

#[component]
fn StartButton(label: &'static str, on_intent: EventHandler<QuizIntent>) -> Element {
    rsx! {
        button {
            class: "btn btn-start",
            r#type: "button",
            onclick: move |_| on_intent.call(QuizIntent::Start),
            "{label}"
        }
    }
}

#[component]
fn AnswerButton(choice: String, on_intent: EventHandler<QuizIntent>) -> Element {
    // Display goes through the text cleaner; the click submits the raw
    // string, which is what exact-match scoring compares against.
    let label = display_text(&choice);
    rsx! {
        button {
            class: "btn btn-choice",
            r#type: "button",
            onclick: move |_| on_intent.call(QuizIntent::Answer(choice.clone())),
            "{label}"
        }
    }
}
