//! Implementation of the `agent-bench agents` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{output, render_agents, CommandOutput};
use crate::domain::models::{AgentDescriptor, AgentRegistry, Config};

#[derive(Args, Debug, Default)]
pub struct AgentsArgs {
    /// Include each agent's rubric
    #[arg(long)]
    pub rubrics: bool,
}

#[derive(Debug, Serialize)]
pub struct AgentsOutput {
    pub agents: Vec<AgentDescriptor>,
    #[serde(skip)]
    registry: AgentRegistry,
    #[serde(skip)]
    rubrics: bool,
}

impl CommandOutput for AgentsOutput {
    fn to_human(&self) -> String {
        let mut text = render_agents(&self.registry);
        if self.rubrics {
            for agent in self.registry.iter() {
                text.push_str(&format!("\n\n{}:\n{}", agent.label, agent.rubric.trim()));
            }
        }
        text
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AgentsArgs, config: Config, json_mode: bool) -> Result<()> {
    let registry = AgentRegistry::new(config.agents).context("Failed to build agent catalog")?;
    let result = AgentsOutput {
        agents: registry.iter().cloned().collect(),
        registry,
        rubrics: args.rubrics,
    };
    output(&result, json_mode);
    Ok(())
}
