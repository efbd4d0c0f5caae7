//! agent-bench - LLM-as-judge benchmark harness for data agents
//!
//! Runs a fixed catalog of agent programs, asks a judge model to score each
//! one's output on five quality dimensions, appends the scores to a JSON
//! history file and prints a report.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Adapters** (`adapters`): Process runner, judge clients, history store
//! - **Service Layer** (`services`): Judge scoring and orchestration
//! - **Application Layer** (`application`): The benchmark harness
//! - **Infrastructure Layer** (`infrastructure`): Config, credentials, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use agent_bench::application::{BenchmarkHarness, HarnessOutcome};
//! use agent_bench::domain::ports::NullObserver;
//! use agent_bench::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let harness = BenchmarkHarness::new(ConfigLoader::load()?, &[])?;
//!     if let HarnessOutcome::Completed(done) = harness.run(&NullObserver).await? {
//!         match done.save_error {
//!             None => println!("saved to {}", done.saved_to.display()),
//!             Some(err) => eprintln!("not saved: {err}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{BenchmarkHarness, CompletedRun, HarnessOutcome};
pub use domain::models::{
    AgentDescriptor, AgentRegistry, BenchmarkRun, Config, Dimension, HistoryLog, RunFailure,
    RunOutcome, Score, ScoreRecord, ScoreTier,
};
pub use domain::ports::{AgentRunner, BenchmarkObserver, HistoryStore, JudgeModel};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{BenchmarkService, JudgeService};
