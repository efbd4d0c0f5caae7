pub mod agent;
pub mod config;
pub mod outcome;
pub mod run;
pub mod score;

pub use agent::{AgentDescriptor, AgentRegistry};
pub use config::{
    Config, CredentialsConfig, HistoryConfig, JudgeConfig, LoggingConfig, RunnerConfig,
};
pub use outcome::{RunFailure, RunOutcome, NO_OUTPUT_SENTINEL};
pub use run::{BenchmarkRun, HistoryLog};
pub use score::{Dimension, DimensionScores, Score, ScoreRecord, ScoreTier, MISSING_SUMMARY};
