//! Result of executing one agent process.

use serde::{Deserialize, Serialize};

/// Captured text when an agent printed nothing but whitespace.
pub const NO_OUTPUT_SENTINEL: &str = "[No output produced]";

/// Why the harness, rather than the agent, decided a run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// The wall-clock budget expired and the process group was killed.
    TimedOut { secs: u64 },

    /// The process could not be started at all.
    SpawnFailed { reason: String },

    /// The process ran but printed nothing.
    NoOutput,
}

impl RunFailure {
    /// Sentinel text recorded as the captured output for this failure.
    pub fn sentinel(&self) -> String {
        match self {
            Self::TimedOut { secs } => format!("[Agent timed out after {secs}s]"),
            Self::SpawnFailed { reason } => format!("[Failed to run agent: {reason}]"),
            Self::NoOutput => NO_OUTPUT_SENTINEL.to_string(),
        }
    }
}

/// What the process runner observed for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Trimmed stdout, plus a stderr excerpt on non-zero exit, or a sentinel
    pub captured_text: String,

    /// True only when the process exited with status zero
    pub succeeded: bool,

    /// Exit status, absent when killed by a signal or never started
    pub exit_code: Option<i32>,

    /// Set when the captured text is a harness sentinel
    pub failure: Option<RunFailure>,
}

impl RunOutcome {
    /// A failure synthesized by the harness. Never counts as success.
    pub fn synthetic(failure: RunFailure, exit_code: Option<i32>) -> Self {
        Self {
            captured_text: failure.sentinel(),
            succeeded: false,
            exit_code,
            failure: Some(failure),
        }
    }

    /// Build an outcome from raw process output.
    ///
    /// Whitespace-only text becomes the no-output sentinel; the exit code
    /// alone decides `succeeded`.
    pub fn from_process(captured_text: &str, exit_code: Option<i32>) -> Self {
        let trimmed = captured_text.trim();
        let succeeded = exit_code == Some(0);

        if trimmed.is_empty() {
            return Self {
                succeeded,
                ..Self::synthetic(RunFailure::NoOutput, exit_code)
            };
        }

        Self {
            captured_text: trimmed.to_string(),
            succeeded,
            exit_code,
            failure: None,
        }
    }

    /// Whether the judge should be skipped for this outcome.
    pub fn is_failure(&self) -> bool {
        !self.succeeded || self.failure.is_some()
    }
}
