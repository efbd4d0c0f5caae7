//! Progress observer port.

use crate::domain::models::{AgentDescriptor, RunOutcome, ScoreRecord};

/// Receives per-agent progress while a benchmark pass runs.
///
/// Callbacks arrive in order for one agent at a time: started, captured,
/// scored.
pub trait BenchmarkObserver: Send + Sync {
    fn agent_started(&self, _agent: &AgentDescriptor) {}

    fn agent_captured(&self, _agent: &AgentDescriptor, _outcome: &RunOutcome) {}

    fn agent_scored(&self, _agent: &AgentDescriptor, _record: &ScoreRecord) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BenchmarkObserver for NullObserver {}
