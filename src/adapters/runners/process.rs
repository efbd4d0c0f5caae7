//! Child-process agent runner.
//!
//! Spawns each agent in its own process group with no stdin, captures its
//! output, and enforces a wall-clock budget. On expiry the whole group is
//! killed and the child reaped before the call returns.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{AgentDescriptor, RunFailure, RunOutcome, RunnerConfig};
use crate::domain::ports::AgentRunner;

/// Process runner configuration.
#[derive(Debug, Clone)]
pub struct ProcessRunnerConfig {
    /// Characters of stderr appended to the output on non-zero exit
    pub stderr_limit: usize,
    /// Working directory for agents (defaults to current dir)
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables
    pub env: BTreeMap<String, String>,
}

impl Default for ProcessRunnerConfig {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for ProcessRunnerConfig {
    fn from(config: &RunnerConfig) -> Self {
        Self {
            stderr_limit: config.stderr_limit,
            working_dir: config.working_dir.clone(),
            env: config.env.clone(),
        }
    }
}

/// Runs agents as isolated child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: ProcessRunnerConfig,
}

impl ProcessRunner {
    pub fn new(config: ProcessRunnerConfig) -> Self {
        Self { config }
    }

    fn build_command(&self, program: &str, agent: &AgentDescriptor) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(agent.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so a timeout can take down grandchildren too
        #[cfg(unix)]
        cmd.process_group(0);

        if let Some(ref wd) = self.config.working_dir {
            cmd.current_dir(wd);
        }
        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }

        cmd
    }

    /// Stdout, plus a bounded stderr excerpt when the exit code is non-zero.
    fn compose_output(&self, stdout: &str, stderr: &str, success: bool) -> String {
        let mut text = stdout.to_string();
        if !success && !stderr.is_empty() {
            let excerpt: String = stderr.chars().take(self.config.stderr_limit).collect();
            text.push_str("\n[stderr]: ");
            text.push_str(&excerpt);
        }
        text
    }
}

#[async_trait]
impl AgentRunner for ProcessRunner {
    #[instrument(skip(self, agent), fields(agent = %agent.key))]
    async fn run(&self, agent: &AgentDescriptor, timeout: Duration) -> RunOutcome {
        let Some(program) = agent.program() else {
            return RunOutcome::synthetic(
                RunFailure::SpawnFailed {
                    reason: "empty command".to_string(),
                },
                None,
            );
        };

        let mut child = match self.build_command(program, agent).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program, error = %e, "failed to spawn agent");
                return RunOutcome::synthetic(
                    RunFailure::SpawnFailed {
                        reason: e.to_string(),
                    },
                    None,
                );
            }
        };

        let pid = child.id();
        debug!(?pid, "agent spawned");

        let stdout_task = child.stdout.take().map(|s| tokio::spawn(read_all(s)));
        let stderr_task = child.stderr.take().map(|s| tokio::spawn(read_all(s)));

        match tokio::time::timeout(timeout, wait_and_clear_group(&mut child, pid)).await {
            Ok(Ok(status)) => {
                let stdout = join_output(stdout_task).await;
                let stderr = join_output(stderr_task).await;

                let text = self.compose_output(&stdout, &stderr, status.success());
                let outcome = RunOutcome::from_process(&text, status.code());
                info!(
                    exit_code = ?status.code(),
                    bytes = stdout.len(),
                    succeeded = outcome.succeeded,
                    "agent finished"
                );
                outcome
            }
            Ok(Err(e)) => {
                terminate(&mut child, pid).await;
                abort(stdout_task);
                abort(stderr_task);
                warn!(error = %e, "failed to wait for agent");
                RunOutcome::synthetic(
                    RunFailure::SpawnFailed {
                        reason: e.to_string(),
                    },
                    None,
                )
            }
            Err(_) => {
                terminate(&mut child, pid).await;
                abort(stdout_task);
                abort(stderr_task);
                let secs = timeout.as_secs();
                warn!(timeout_secs = secs, "agent timed out, process group killed");
                RunOutcome::synthetic(RunFailure::TimedOut { secs }, None)
            }
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        debug!(error = %e, "agent pipe closed with error");
    }
    buf
}

async fn join_output(task: Option<JoinHandle<Vec<u8>>>) -> String {
    match task {
        Some(handle) => handle
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default(),
        None => String::new(),
    }
}

fn abort(task: Option<JoinHandle<Vec<u8>>>) {
    if let Some(handle) = task {
        handle.abort();
    }
}

/// Wait for the agent to exit, then kill what is left of its process group.
///
/// Background processes left behind by the agent would keep the pipes open.
/// Where the platform allows it, the group is killed while the exited leader
/// is still unreaped, so its pid cannot have been handed out again.
async fn wait_and_clear_group(
    child: &mut Child,
    pid: Option<u32>,
) -> std::io::Result<ExitStatus> {
    if wait_exited_unreaped(pid).await {
        kill_group(pid);
        child.wait().await
    } else {
        let status = child.wait().await?;
        // Leader already reaped: a recycled pid could in principle name a
        // new group here. Accepted where waitid is unavailable.
        kill_group(pid);
        Ok(status)
    }
}

/// Block until `pid` has exited, leaving it a zombie. False if that could
/// not be observed.
#[cfg(any(target_os = "linux", target_os = "android"))]
async fn wait_exited_unreaped(pid: Option<u32>) -> bool {
    use nix::errno::Errno;
    use nix::sys::wait::{waitid, Id, WaitPidFlag};
    use nix::unistd::Pid;

    let Some(raw) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return false;
    };
    let waited = tokio::task::spawn_blocking(move || loop {
        match waitid(
            Id::Pid(Pid::from_raw(raw)),
            WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT,
        ) {
            Err(Errno::EINTR) => continue,
            other => break other,
        }
    })
    .await;

    match waited {
        Ok(Ok(_)) => true,
        Ok(Err(errno)) => {
            debug!(%errno, "waitid failed, reaping directly");
            false
        }
        Err(e) => {
            debug!(error = %e, "wait task failed");
            false
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
async fn wait_exited_unreaped(_pid: Option<u32>) -> bool {
    false
}

/// Kill the process group and reap the direct child.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    kill_group(pid);
    if let Err(e) = child.kill().await {
        debug!(error = %e, "agent already exited");
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(raw) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    // ESRCH just means the group is already empty
    if let Err(errno) = killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        debug!(%errno, "process group not signalled");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> AgentDescriptor {
        AgentDescriptor::new(
            "test_agent",
            "Test Agent",
            vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            "rubric",
        )
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = ProcessRunner::default();
        let outcome = runner
            .run(&sh("echo 'Current Yield: 4.523%'"), Duration::from_secs(10))
            .await;

        assert!(outcome.succeeded);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.captured_text, "Current Yield: 4.523%");
        assert!(outcome.failure.is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_appends_stderr() {
        let runner = ProcessRunner::default();
        let outcome = runner
            .run(&sh("echo partial; echo boom >&2; exit 3"), Duration::from_secs(10))
            .await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.exit_code, Some(3));
        assert!(outcome.captured_text.starts_with("partial"));
        assert!(outcome.captured_text.ends_with("[stderr]: boom"));
    }

    #[tokio::test]
    async fn test_stderr_excerpt_is_bounded() {
        let runner = ProcessRunner::default();
        let outcome = runner
            .run(
                &sh("head -c 2000 /dev/zero | tr '\\0' x >&2; exit 1"),
                Duration::from_secs(10),
            )
            .await;

        assert_eq!(outcome.captured_text, format!("[stderr]: {}", "x".repeat(500)));
    }

    #[tokio::test]
    async fn test_stderr_ignored_on_success() {
        let runner = ProcessRunner::default();
        let outcome = runner
            .run(&sh("echo ok; echo noise >&2"), Duration::from_secs(10))
            .await;

        assert_eq!(outcome.captured_text, "ok");
    }

    #[tokio::test]
    async fn test_empty_output_sentinel() {
        let runner = ProcessRunner::default();
        let outcome = runner.run(&sh("printf '  \\n'"), Duration::from_secs(10)).await;

        assert_eq!(outcome.captured_text, "[No output produced]");
        assert_eq!(outcome.failure, Some(RunFailure::NoOutput));
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn test_timeout_kills_and_reaps_child() {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let runner = ProcessRunner::default();
        let start = Instant::now();
        let outcome = runner.run(&sh(&script), Duration::from_secs(1)).await;

        assert!(start.elapsed() < Duration::from_secs(10));
        assert!(!outcome.succeeded);
        assert_eq!(outcome.captured_text, "[Agent timed out after 1s]");
        assert_eq!(outcome.failure, Some(RunFailure::TimedOut { secs: 1 }));

        let pid: i32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert!(kill(Pid::from_raw(pid), None).is_err(), "child still running");
    }

    #[tokio::test]
    async fn test_spawn_failure_is_contained() {
        let agent = AgentDescriptor::new(
            "missing",
            "Missing",
            vec!["/nonexistent/agent-binary".to_string()],
            "rubric",
        );
        let outcome = ProcessRunner::default()
            .run(&agent, Duration::from_secs(5))
            .await;

        assert!(!outcome.succeeded);
        assert!(outcome.captured_text.starts_with("[Failed to run agent: "));
        assert!(matches!(outcome.failure, Some(RunFailure::SpawnFailed { .. })));
    }

    #[tokio::test]
    async fn test_background_children_do_not_block() {
        let runner = ProcessRunner::default();
        let start = Instant::now();
        let outcome = runner
            .run(&sh("sleep 30 & echo done"), Duration::from_secs(20))
            .await;

        assert!(start.elapsed() < Duration::from_secs(10));
        assert_eq!(outcome.captured_text, "done");
        assert!(outcome.succeeded);
    }

    #[tokio::test]
    async fn test_background_children_killed_after_exit() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late");
        let script = format!("(sleep 1; touch {}) & echo started", marker.display());

        let runner = ProcessRunner::default();
        let outcome = runner.run(&sh(&script), Duration::from_secs(20)).await;
        assert_eq!(outcome.captured_text, "started");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists(), "background child outlived the agent");
    }

    #[tokio::test]
    async fn test_env_and_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = BTreeMap::new();
        env.insert("BENCH_MARKER".to_string(), "marker-42".to_string());

        let runner = ProcessRunner::new(ProcessRunnerConfig {
            stderr_limit: 500,
            working_dir: Some(dir.path().to_path_buf()),
            env,
        });
        let outcome = runner
            .run(&sh("echo $BENCH_MARKER; pwd"), Duration::from_secs(10))
            .await;

        let canonical = dir.path().canonicalize().unwrap();
        assert!(outcome.captured_text.starts_with("marker-42"));
        assert!(outcome
            .captured_text
            .contains(canonical.file_name().unwrap().to_str().unwrap()));
    }
}
