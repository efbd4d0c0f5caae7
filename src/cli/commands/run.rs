//! Implementation of the `agent-bench run` command.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::application::{BenchmarkHarness, HarnessOutcome};
use crate::cli::display::{banner, output, render_report, render_unsaved_report, CommandOutput};
use crate::cli::progress::SpinnerObserver;
use crate::domain::models::{AgentRegistry, BenchmarkRun, Config};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Only run these agents (comma-separated keys, catalog order is kept)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// The report was printed, but the run is missing from history.
///
/// Already shown to the user, so the caller only turns it into an exit code.
#[derive(Debug, Error)]
#[error("benchmark run not saved to {}: {reason}", path.display())]
pub struct HistoryNotSaved {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct CompletedOutput {
    #[serde(flatten)]
    pub run: BenchmarkRun,
    pub saved_to: PathBuf,
    pub history_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
    #[serde(skip)]
    registry: AgentRegistry,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutput {
    Completed(CompletedOutput),
    Aborted { reason: String },
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        match self {
            Self::Completed(done) => {
                let report = match &done.save_error {
                    None => render_report(&done.registry, &done.run, &done.saved_to),
                    Some(error) => {
                        render_unsaved_report(&done.registry, &done.run, &done.saved_to, error)
                    }
                };
                format!("\n{report}")
            }
            Self::Aborted { reason } => {
                format!("  [!] {reason}\n  Benchmark aborted; no agents were run.")
            }
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RunArgs, config: Config, json_mode: bool) -> Result<()> {
    let harness =
        BenchmarkHarness::new(config, &args.only).context("Failed to build agent catalog")?;

    if !json_mode {
        println!("{}\n", banner(&Local::now()));
    }

    let observer = SpinnerObserver::new(json_mode);
    let outcome = harness
        .run(&observer)
        .await
        .context("Failed to start benchmark run")?;

    let result = match outcome {
        HarnessOutcome::Completed(done) => RunOutput::Completed(CompletedOutput {
            run: done.run,
            saved_to: done.saved_to,
            history_len: done.history_len,
            save_error: done.save_error,
            registry: harness.registry().clone(),
        }),
        HarnessOutcome::Aborted { reason } => RunOutput::Aborted { reason },
    };

    output(&result, json_mode);

    match result {
        RunOutput::Completed(CompletedOutput {
            saved_to,
            save_error: Some(reason),
            ..
        }) => Err(HistoryNotSaved {
            path: saved_to,
            reason,
        }
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ScoreRecord;
    use std::collections::BTreeMap;

    #[test]
    fn test_completed_json_shape() {
        let mut agents = BTreeMap::new();
        agents.insert("vix".to_string(), ScoreRecord::agent_failed());
        let result = RunOutput::Completed(CompletedOutput {
            run: BenchmarkRun::new("2026-10-19T08:00:00+00:00", agents),
            saved_to: PathBuf::from("state/benchmark_scores.json"),
            history_len: Some(4),
            save_error: None,
            registry: AgentRegistry::builtin(),
        });

        let json = result.to_json();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["timestamp"], "2026-10-19T08:00:00+00:00");
        assert_eq!(json["agents"]["vix"]["overall"], 1.0);
        assert_eq!(json["history_len"], 4);
        assert!(json.get("save_error").is_none());
        assert!(json.get("registry").is_none());
    }

    #[test]
    fn test_unsaved_run_still_reports_scores() {
        let mut agents = BTreeMap::new();
        agents.insert("bond_yield".to_string(), ScoreRecord::agent_failed());
        let result = RunOutput::Completed(CompletedOutput {
            run: BenchmarkRun::new("2026-10-19T08:00:00+00:00", agents),
            saved_to: PathBuf::from("state/benchmark_scores.json"),
            history_len: None,
            save_error: Some("disk full".to_string()),
            registry: AgentRegistry::builtin(),
        });

        let human = result.to_human();
        assert!(human.contains("Bond Yield"));
        assert!(human.contains("[!] Not saved to state/benchmark_scores.json: disk full"));

        let json = result.to_json();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["save_error"], "disk full");
        assert!(json["history_len"].is_null());
    }

    #[test]
    fn test_aborted_output() {
        let result = RunOutput::Aborted {
            reason: "openai_api_key not found".to_string(),
        };
        assert_eq!(result.to_json()["status"], "aborted");
        assert!(result.to_human().contains("[!] openai_api_key not found"));
    }
}
