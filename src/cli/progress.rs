//! Live progress for `run` using indicatif spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::cli::display::progress_line;
use crate::domain::models::{AgentDescriptor, RunOutcome, ScoreRecord};
use crate::domain::ports::BenchmarkObserver;

const SPINNER_TEMPLATE: &str = "  {spinner:.green} {msg} [{elapsed}]";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Shows a spinner per agent and prints a score line once it is judged.
///
/// Quiet observers draw nothing, keeping stdout clean for `--json`.
pub struct SpinnerObserver {
    quiet: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl SpinnerObserver {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            current: Mutex::new(None),
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if self.quiet {
            return;
        }
        if let Ok(mut current) = self.current.lock() {
            f(&mut current);
        }
    }
}

impl BenchmarkObserver for SpinnerObserver {
    fn agent_started(&self, agent: &AgentDescriptor) {
        self.with_spinner(|current| {
            *current = Some(create_spinner(format!("{} running", agent.label)));
        });
    }

    fn agent_captured(&self, agent: &AgentDescriptor, outcome: &RunOutcome) {
        let status = if outcome.is_failure() { "failed" } else { "judging" };
        self.with_spinner(|current| {
            if let Some(spinner) = current.as_ref() {
                spinner.set_message(format!("{} {status}", agent.label));
            }
        });
    }

    fn agent_scored(&self, agent: &AgentDescriptor, record: &ScoreRecord) {
        self.with_spinner(|current| {
            if let Some(spinner) = current.take() {
                spinner.finish_and_clear();
            }
            println!("{}", progress_line(&agent.label, record));
        });
    }
}
