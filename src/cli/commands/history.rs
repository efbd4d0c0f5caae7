//! Implementation of the `agent-bench history` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::history::JsonFileHistoryStore;
use crate::cli::display::{output, render_history, CommandOutput};
use crate::domain::models::{AgentRegistry, BenchmarkRun, Config};
use crate::domain::ports::HistoryStore;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of most recent runs to show
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub path: PathBuf,
    pub total_runs: usize,
    pub runs: Vec<BenchmarkRun>,
    #[serde(skip)]
    registry: AgentRegistry,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        format!(
            "History: {}\n{}",
            self.path.display(),
            render_history(&self.registry, &self.runs, self.runs.len())
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Load history and keep the last `limit` runs.
pub fn collect(config: &Config, limit: usize) -> Result<HistoryOutput> {
    let registry =
        AgentRegistry::new(config.agents.clone()).context("Failed to build agent catalog")?;
    let store = JsonFileHistoryStore::new(&config.history.path);
    let mut runs = store.load();
    let total_runs = runs.len();
    runs.drain(..total_runs.saturating_sub(limit));

    Ok(HistoryOutput {
        path: store.location().to_path_buf(),
        total_runs,
        runs,
        registry,
    })
}

pub async fn execute(args: HistoryArgs, config: Config, json_mode: bool) -> Result<()> {
    let result = collect(&config, args.limit)?;
    output(&result, json_mode);
    Ok(())
}
