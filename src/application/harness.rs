//! Benchmark harness.
//!
//! One invocation: resolve the judge credential, run and score every
//! selected agent, append the run to history, and hand the results back for
//! reporting. A missing credential stops everything before any agent runs.
//! A failed history write does not discard the scores.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::adapters::history::JsonFileHistoryStore;
use crate::adapters::judges::{OpenAiJudge, OpenAiJudgeConfig};
use crate::adapters::runners::{ProcessRunner, ProcessRunnerConfig};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentRegistry, BenchmarkRun, Config};
use crate::domain::ports::{AgentRunner, BenchmarkObserver, HistoryStore, JudgeModel};
use crate::infrastructure::credentials::CredentialLoader;
use crate::services::{BenchmarkService, JudgeService};

/// A run that was scored, whether or not history could be written.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub run: BenchmarkRun,
    pub saved_to: PathBuf,
    /// Number of runs in history, this one included; `None` when not saved
    pub history_len: Option<usize>,
    /// Why the history write failed
    pub save_error: Option<String>,
}

impl CompletedRun {
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Result of one harness invocation.
#[derive(Debug, Clone)]
pub enum HarnessOutcome {
    Completed(CompletedRun),
    /// Nothing ran and history was not touched
    Aborted { reason: String },
}

/// Ties configuration, agents, judge and history together.
pub struct BenchmarkHarness {
    config: Config,
    registry: AgentRegistry,
}

impl BenchmarkHarness {
    /// Harness over the configured catalog, optionally narrowed to `only`.
    pub fn new(config: Config, only: &[String]) -> DomainResult<Self> {
        let registry = AgentRegistry::new(config.agents.clone())?;
        let registry = if only.is_empty() {
            registry
        } else {
            registry.select(only)?
        };
        Ok(Self { config, registry })
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run against the real judge endpoint, agent processes and history file.
    pub async fn run(&self, observer: &dyn BenchmarkObserver) -> DomainResult<HarnessOutcome> {
        let api_key = match CredentialLoader::new(&self.config.credentials).load() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "judge credential missing, benchmark aborted");
                return Ok(HarnessOutcome::Aborted {
                    reason: e.to_string(),
                });
            }
        };

        let judge = OpenAiJudge::new(OpenAiJudgeConfig::from_config(&self.config.judge, api_key))
            .map_err(|e| DomainError::ValidationFailed(e.to_string()))?;
        let runner = ProcessRunner::new(ProcessRunnerConfig::from(&self.config.runner));
        let store = JsonFileHistoryStore::new(&self.config.history.path);

        self.run_with(Arc::new(judge), Arc::new(runner), &store, observer)
            .await
    }

    /// Run with explicit collaborators.
    #[instrument(skip_all, fields(agents = self.registry.len(), history = %store.location().display()))]
    pub async fn run_with(
        &self,
        judge: Arc<dyn JudgeModel>,
        runner: Arc<dyn AgentRunner>,
        store: &dyn HistoryStore,
        observer: &dyn BenchmarkObserver,
    ) -> DomainResult<HarnessOutcome> {
        let service = BenchmarkService::new(
            runner,
            JudgeService::new(judge, self.config.judge.max_output_chars),
            Duration::from_secs(self.config.runner.timeout_secs),
        );

        let results = service.run_all(&self.registry, observer).await;
        let run = BenchmarkRun::now(results);

        let (history_len, save_error) = match store.append(run.clone()) {
            Ok(history) => {
                info!(runs = history.len(), "benchmark run saved");
                (Some(history.len()), None)
            }
            Err(e) => {
                error!(error = %e, "benchmark run not saved");
                (None, Some(e.to_string()))
            }
        };

        Ok(HarnessOutcome::Completed(CompletedRun {
            run,
            saved_to: store.location().to_path_buf(),
            history_len,
            save_error,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::judges::MockJudge;
    use crate::domain::models::{AgentDescriptor, CredentialsConfig};
    use crate::domain::ports::NullObserver;

    fn echo_agent(key: &str) -> AgentDescriptor {
        AgentDescriptor::new(
            key,
            key.to_uppercase(),
            vec!["echo".to_string(), "Current Yield: 4.523%".to_string()],
            "Must show a yield.",
        )
    }

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config {
            agents: vec![echo_agent("alpha"), echo_agent("beta")],
            ..Default::default()
        };
        config.history.path = dir.join("state").join("scores.json");
        config.credentials = CredentialsConfig {
            path: dir.join("missing.json"),
            key_field: "openai_api_key".to_string(),
            env_var: "AGENT_BENCH_HARNESS_TEST_KEY".to_string(),
        };
        config
    }

    #[test]
    fn test_select_unknown_agent() {
        let err = BenchmarkHarness::new(Config::default(), &["nope".to_string()])
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::AgentNotFound(_)));
    }

    #[test]
    fn test_select_subset() {
        let harness =
            BenchmarkHarness::new(Config::default(), &["ipo_scout".to_string()]).unwrap();
        assert_eq!(harness.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_aborts_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let history_path = config.history.path.clone();
        let harness = BenchmarkHarness::new(config, &[]).unwrap();

        // Neither the credential file nor the env var exists
        let outcome = harness.run(&NullObserver).await.unwrap();

        match outcome {
            HarnessOutcome::Aborted { reason } => assert!(reason.contains("openai_api_key")),
            HarnessOutcome::Completed(_) => panic!("expected abort"),
        }
        assert!(!history_path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_with_appends_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let store = JsonFileHistoryStore::new(&config.history.path);
        let harness = BenchmarkHarness::new(config, &[]).unwrap();
        let judge = Arc::new(MockJudge::replying(
            r#"{"scores":{"completeness":5,"data_quality":5,"relevance":4,"clarity":5,"error_free":5}}"#,
        ));

        for expected_len in 1..=2 {
            let outcome = harness
                .run_with(
                    judge.clone(),
                    Arc::new(ProcessRunner::default()),
                    &store,
                    &NullObserver,
                )
                .await
                .unwrap();
            let HarnessOutcome::Completed(done) = outcome else {
                panic!("expected completed run");
            };
            assert_eq!(done.history_len, Some(expected_len));
            assert!(done.is_saved());
            assert_eq!(done.run.agents.len(), 2);
            assert!((done.run.agents["alpha"].overall() - 4.8).abs() < f64::EPSILON);
        }

        assert_eq!(store.load().len(), 2);
        assert_eq!(judge.calls(), 4);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unwritable_history_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.agents.truncate(1);
        // Parent of the history file is a regular file
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        config.history.path = blocker.join("scores.json");
        let store = JsonFileHistoryStore::new(&config.history.path);
        let harness = BenchmarkHarness::new(config, &[]).unwrap();
        let judge = Arc::new(MockJudge::replying(
            r#"{"scores":{"completeness":5,"data_quality":5,"relevance":4,"clarity":5,"error_free":5},"summary":"fine"}"#,
        ));

        let outcome = harness
            .run_with(
                judge.clone(),
                Arc::new(ProcessRunner::default()),
                &store,
                &NullObserver,
            )
            .await
            .unwrap();

        let HarnessOutcome::Completed(done) = outcome else {
            panic!("expected completed run");
        };
        assert!(!done.is_saved());
        assert_eq!(done.history_len, None);
        assert!(done.save_error.unwrap().contains("blocker"));
        assert_eq!(done.saved_to, blocker.join("scores.json"));
        assert!((done.run.agents["alpha"].overall() - 4.8).abs() < f64::EPSILON);
        assert_eq!(judge.calls(), 1);
    }
}
