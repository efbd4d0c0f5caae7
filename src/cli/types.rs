//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{agents::AgentsArgs, history::HistoryArgs, run::RunArgs};

#[derive(Parser, Debug)]
#[command(name = "agent-bench")]
#[command(about = "LLM-as-judge benchmark for scheduled data agents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (replaces .agent-bench/config.yaml and local.yaml)
    #[arg(short, long, global = true, env = "AGENT_BENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every agent, score it and append the results to history (default)
    Run(RunArgs),

    /// Show recent benchmark runs
    History(HistoryArgs),

    /// List the configured agents
    Agents(AgentsArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Run(RunArgs::default())
    }
}
