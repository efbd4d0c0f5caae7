//! Port trait definitions (Hexagonal Architecture)
//!
//! - AgentRunner: executes one agent process
//! - JudgeModel: sends a prompt to the scoring model
//! - HistoryStore: loads and persists benchmark history
//! - BenchmarkObserver: receives live progress from the orchestrator

pub mod history;
pub mod judge;
pub mod observer;
pub mod runner;

pub use history::HistoryStore;
pub use judge::{JudgeError, JudgeModel};
pub use observer::{BenchmarkObserver, NullObserver};
pub use runner::AgentRunner;
