//! Benchmark orchestration.
//!
//! Runs every agent in catalog order, one at a time, and scores each
//! outcome before moving to the next agent.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::models::{AgentDescriptor, AgentRegistry, ScoreRecord};
use crate::domain::ports::{AgentRunner, BenchmarkObserver};
use crate::services::judge_service::JudgeService;

/// Sequential run-then-score pass over an agent catalog.
pub struct BenchmarkService {
    runner: Arc<dyn AgentRunner>,
    judge: JudgeService,
    default_timeout: Duration,
}

impl BenchmarkService {
    pub fn new(runner: Arc<dyn AgentRunner>, judge: JudgeService, default_timeout: Duration) -> Self {
        Self {
            runner,
            judge,
            default_timeout,
        }
    }

    /// Wall-clock budget for one agent.
    pub fn timeout_for(&self, agent: &AgentDescriptor) -> Duration {
        agent
            .timeout_secs
            .map_or(self.default_timeout, Duration::from_secs)
    }

    /// Run and score every agent in `registry`.
    ///
    /// The result has exactly one record per catalog key; individual agent
    /// or judge failures never abort the pass.
    #[instrument(skip_all, fields(agents = registry.len()))]
    pub async fn run_all(
        &self,
        registry: &AgentRegistry,
        observer: &dyn BenchmarkObserver,
    ) -> BTreeMap<String, ScoreRecord> {
        let mut results = BTreeMap::new();

        for agent in registry.iter() {
            observer.agent_started(agent);

            let outcome = self.runner.run(agent, self.timeout_for(agent)).await;
            observer.agent_captured(agent, &outcome);

            let record = self.judge.score(agent, &outcome).await;
            observer.agent_scored(agent, &record);

            results.insert(agent.key.clone(), record);
        }

        info!(scored = results.len(), "benchmark pass complete");
        results
    }
}
