//! Benchmark runs and the persisted history.

use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::score::ScoreRecord;

/// Every agent's score for a single harness execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRun {
    /// ISO-8601 local time, second precision
    pub timestamp: String,

    /// Score records keyed by agent key
    pub agents: BTreeMap<String, ScoreRecord>,
}

impl BenchmarkRun {
    pub fn new(timestamp: impl Into<String>, agents: BTreeMap<String, ScoreRecord>) -> Self {
        Self {
            timestamp: timestamp.into(),
            agents,
        }
    }

    /// Stamp a result mapping with the current local time.
    pub fn now(agents: BTreeMap<String, ScoreRecord>) -> Self {
        Self::new(
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            agents,
        )
    }

    pub fn get(&self, key: &str) -> Option<&ScoreRecord> {
        self.agents.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Mean of the agents' overall scores, rounded to one decimal.
    pub fn mean_overall(&self) -> Option<f64> {
        if self.agents.is_empty() {
            return None;
        }
        let total: f64 = self.agents.values().map(ScoreRecord::overall).sum();
        Some(super::score::round_one_decimal(total / self.agents.len() as f64))
    }
}

/// Ordered sequence of runs, oldest first.
pub type HistoryLog = Vec<BenchmarkRun>;
