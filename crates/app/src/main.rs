use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, OpenTriviaClient, QuizConfig, QuizLoopService};
use ui::{App, AppContext};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--api-base-url <url>] [--batch-size <n>] [--seconds-per-question <n>]"
    );
    eprintln!();
    eprintln!("Flags override the environment, which overrides the built-ins:");
    eprintln!("  TRIVIA_API_BASE_URL          (default https://opentdb.com)");
    eprintln!("  TRIVIA_BATCH_SIZE            (default 10)");
    eprintln!("  TRIVIA_SECONDS_PER_QUESTION  (default 10)");
}

fn parse_config(args: &mut impl Iterator<Item = String>) -> Result<QuizConfig, ArgsError> {
    let mut config = QuizConfig::from_env();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-base-url" => {
                let value = require_value(args, "--api-base-url")?;
                config.base_url = value;
            }
            "--batch-size" => {
                let value = require_value(args, "--batch-size")?;
                let parsed: u8 = value
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ArgsError::InvalidNumber {
                        flag: "--batch-size",
                        raw: value.clone(),
                    })?;
                config.batch_size = parsed;
            }
            "--seconds-per-question" => {
                let value = require_value(args, "--seconds-per-question")?;
                let parsed: u32 = value
                    .parse()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ArgsError::InvalidNumber {
                        flag: "--seconds-per-question",
                        raw: value.clone(),
                    })?;
                config.seconds_per_question = parsed;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    Ok(config)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let config = parse_config(&mut argv).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    log::debug!(
        "starting with base_url={} batch_size={} seconds_per_question={}",
        config.base_url,
        config.batch_size,
        config.seconds_per_question
    );

    let source = Arc::new(OpenTriviaClient::new(config.base_url.clone()));
    let quiz_loop = Arc::new(QuizLoopService::new(Clock::system(), source).with_config(config));
    let context = AppContext::new(quiz_loop);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Trivia")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
