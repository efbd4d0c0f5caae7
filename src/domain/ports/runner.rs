//! Agent runner port - interface for executing agent programs.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::models::{AgentDescriptor, RunOutcome};

/// Executes one agent and reports what happened.
///
/// Implementations never fail: spawn errors and timeouts are folded into
/// the returned outcome.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    /// Run `agent` to completion or until `timeout` expires.
    async fn run(&self, agent: &AgentDescriptor, timeout: Duration) -> RunOutcome;
}
