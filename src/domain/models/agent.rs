//! Agent descriptors and the static agent registry.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::errors::{DomainError, DomainResult};

/// One benchmarked agent.
///
/// The key is the join key across run outcomes, score records and the
/// persisted history, so it must be unique within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AgentDescriptor {
    /// Unique identifier, e.g. `bond_yield`
    pub key: String,

    /// Display name used in reports
    pub label: String,

    /// Program followed by its arguments
    pub command: Vec<String>,

    /// Scoring criteria injected verbatim into the judge prompt
    pub rubric: String,

    /// Per-agent wall-clock budget; falls back to `runner.timeout_secs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AgentDescriptor {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        command: Vec<String>,
        rubric: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            command,
            rubric: rubric.into(),
            timeout_secs: None,
        }
    }

    /// Override the runner's default timeout for this agent.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// The executable, if the command is non-empty.
    pub fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str)
    }

    /// Arguments passed after the program.
    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }

    fn python_script(key: &str, label: &str, rubric: &str) -> Self {
        Self::new(
            key,
            label,
            vec!["python3".to_string(), format!("agents/{key}.py")],
            rubric,
        )
    }
}

/// Immutable, ordered catalog of agents.
///
/// Registration order is both execution order and report row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    /// Build a registry, rejecting empty catalogs, duplicate keys and
    /// descriptors that cannot be executed or scored.
    pub fn new(agents: Vec<AgentDescriptor>) -> DomainResult<Self> {
        validate_agents(&agents)?;
        Ok(Self { agents })
    }

    /// The five investment agents the harness ships with.
    pub fn builtin() -> Self {
        Self {
            agents: builtin_agents(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    pub fn get(&self, key: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.key == key)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Restrict the registry to `keys`, keeping registration order.
    pub fn select(&self, keys: &[String]) -> DomainResult<Self> {
        if let Some(unknown) = keys.iter().find(|k| self.get(k).is_none()) {
            return Err(DomainError::AgentNotFound(unknown.clone()));
        }

        let agents = self
            .agents
            .iter()
            .filter(|a| keys.contains(&a.key))
            .cloned()
            .collect();
        Self::new(agents)
    }
}

/// Check a descriptor list before it becomes a registry.
pub fn validate_agents(agents: &[AgentDescriptor]) -> DomainResult<()> {
    if agents.is_empty() {
        return Err(DomainError::ValidationFailed(
            "agent registry cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for agent in agents {
        if agent.key.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "agent key cannot be empty".to_string(),
            ));
        }
        if !seen.insert(agent.key.as_str()) {
            return Err(DomainError::ValidationFailed(format!(
                "duplicate agent key '{}'",
                agent.key
            )));
        }
        if agent.label.trim().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "agent '{}' label cannot be empty",
                agent.key
            )));
        }
        if agent.program().map_or(true, |p| p.trim().is_empty()) {
            return Err(DomainError::ValidationFailed(format!(
                "agent '{}' command cannot be empty",
                agent.key
            )));
        }
        if agent.rubric.trim().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "agent '{}' rubric cannot be empty",
                agent.key
            )));
        }
        if agent.timeout_secs == Some(0) {
            return Err(DomainError::ValidationFailed(format!(
                "agent '{}' timeout must be at least 1 second",
                agent.key
            )));
        }
    }

    Ok(())
}

/// Default catalog used when configuration does not list any agents.
pub fn builtin_agents() -> Vec<AgentDescriptor> {
    vec![
        AgentDescriptor::python_script(
            "bond_yield",
            "Bond Yield",
            "This agent monitors the US 10-year Treasury yield (^TNX). \
             A good output contains: (1) a current yield percentage (e.g. '4.523%'), \
             (2) a daily change in basis points (e.g. '+2.1 bps'), \
             (3) a direction arrow (▲ or ▼ or ─), and (4) a context sentence explaining \
             what the yield level means for investors (e.g. 'Elevated — pressure on \
             valuations...'). Output should have no Python errors or tracebacks.",
        ),
        AgentDescriptor::python_script(
            "daily_news",
            "Daily News",
            "This agent summarizes the 3 most market-moving news items of the day. \
             A good output contains: (1) exactly 3 numbered news items, (2) each item \
             has a bold topic and 1-2 sentences of market context, (3) a 'Market Mood' \
             indicator (Bullish/Bearish/Mixed with emoji), and (4) total summary ≤200 words. \
             Output should not contain API error messages or fallback text like 'key not found'.",
        ),
        AgentDescriptor::python_script(
            "earnings_reminder",
            "Earnings Reminder",
            "This agent checks which watchlist stocks have earnings in the next 2 days \
             and lists upcoming earnings in the next 30 days. A good output contains: \
             (1) a clear T-2 alert section (alerts or confirmation of none), \
             (2) an upcoming earnings table with ticker, company name, date, and days away, \
             (3) the watchlist tickers checked (should be 10+), and \
             (4) no Python errors or 'Could not fetch' for all tickers.",
        ),
        AgentDescriptor::python_script(
            "ipo_scout",
            "IPO Scout",
            "This agent scrapes for upcoming tech IPOs and flags new ones with ⭐. \
             A good output contains: (1) a formatted table with Symbol, Company, Date columns, \
             (2) ⭐ markers on IPOs not seen before, (3) a summary count line. \
             If no tech IPOs are found, 'No upcoming tech IPOs found' is acceptable \
             and should still score well on clarity and error-free dimensions.",
        ),
        AgentDescriptor::python_script(
            "price_alerts",
            "Price Alerts",
            "This agent checks stock prices against configured thresholds. \
             A good output contains: (1) a triggered alerts section or clear 'no breaches' message, \
             (2) a 'Within range' table showing current price vs thresholds for each ticker, \
             (3) prices formatted as '$NNN.NN', and (4) % distance from threshold for alerts. \
             The within-range table must include at least 3 tickers.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(key: &str) -> AgentDescriptor {
        AgentDescriptor::new(key, key.to_uppercase(), vec!["true".to_string()], "rubric")
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = AgentRegistry::builtin();
        assert_eq!(registry.len(), 5);
        assert!(validate_agents(&builtin_agents()).is_ok());

        let keys: Vec<_> = registry.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["bond_yield", "daily_news", "earnings_reminder", "ipo_scout", "price_alerts"]
        );
    }

    #[test]
    fn test_builtin_commands_point_at_scripts() {
        let registry = AgentRegistry::builtin();
        let bond = registry.get("bond_yield").unwrap();
        assert_eq!(bond.program(), Some("python3"));
        assert_eq!(bond.args(), &["agents/bond_yield.py".to_string()]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = AgentRegistry::new(vec![agent("a"), agent("a")]);
        assert!(matches!(result, Err(DomainError::ValidationFailed(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(AgentRegistry::new(vec![]).is_err());
    }

    #[test]
    fn test_empty_command_rejected() {
        let mut bad = agent("a");
        bad.command.clear();
        assert!(AgentRegistry::new(vec![bad]).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let bad = agent("a").with_timeout(0);
        assert!(AgentRegistry::new(vec![bad]).is_err());
    }

    #[test]
    fn test_select_preserves_registration_order() {
        let registry = AgentRegistry::new(vec![agent("a"), agent("b"), agent("c")]).unwrap();
        let selected = registry
            .select(&["c".to_string(), "a".to_string()])
            .unwrap();
        let keys: Vec<_> = selected.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_select_unknown_key() {
        let registry = AgentRegistry::new(vec![agent("a")]).unwrap();
        let result = registry.select(&["zzz".to_string()]);
        assert!(matches!(result, Err(DomainError::AgentNotFound(k)) if k == "zzz"));
    }

    #[test]
    fn test_descriptor_yaml_defaults() {
        let yaml = "key: x\nlabel: X\ncommand: [\"./x.sh\"]\nrubric: be good\n";
        let parsed: AgentDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.timeout_secs, None);
        assert_eq!(parsed.program(), Some("./x.sh"));
        assert!(parsed.args().is_empty());
    }
}
