use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::agent::{builtin_agents, AgentDescriptor};

/// Main configuration structure for the benchmark harness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Judge endpoint configuration
    #[serde(default)]
    pub judge: JudgeConfig,

    /// Agent process configuration
    #[serde(default)]
    pub runner: RunnerConfig,

    /// History file configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Where the judge credential lives
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agent catalog, in execution order
    #[serde(default = "builtin_agents")]
    pub agents: Vec<AgentDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            judge: JudgeConfig::default(),
            runner: RunnerConfig::default(),
            history: HistoryConfig::default(),
            credentials: CredentialsConfig::default(),
            logging: LoggingConfig::default(),
            agents: builtin_agents(),
        }
    }
}

/// Judge endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JudgeConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_judge_base_url")]
    pub base_url: String,

    /// Scoring model
    #[serde(default = "default_judge_model")]
    pub model: String,

    /// Output token budget for the judge reply
    #[serde(default = "default_judge_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_judge_timeout_secs")]
    pub timeout_secs: u64,

    /// Characters of agent output shown to the judge
    #[serde(default = "default_max_output_chars")]
    pub max_output_chars: usize,
}

fn default_judge_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_judge_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_judge_max_tokens() -> u32 {
    256
}

const fn default_judge_timeout_secs() -> u64 {
    60
}

const fn default_max_output_chars() -> usize {
    3000
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_judge_base_url(),
            model: default_judge_model(),
            max_tokens: default_judge_max_tokens(),
            timeout_secs: default_judge_timeout_secs(),
            max_output_chars: default_max_output_chars(),
        }
    }
}

/// Agent process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunnerConfig {
    /// Default wall-clock budget per agent
    #[serde(default = "default_runner_timeout_secs")]
    pub timeout_secs: u64,

    /// Characters of stderr kept when an agent exits non-zero
    #[serde(default = "default_stderr_limit")]
    pub stderr_limit: usize,

    /// Working directory for agent processes (defaults to current dir)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables for agent processes
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

const fn default_runner_timeout_secs() -> u64 {
    60
}

const fn default_stderr_limit() -> usize {
    500
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_runner_timeout_secs(),
            stderr_limit: default_stderr_limit(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }
}

/// History file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistoryConfig {
    /// JSON document holding every past run
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("state/benchmark_scores.json")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

/// Judge credential source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CredentialsConfig {
    /// JSON file holding the API key
    #[serde(default = "default_credentials_path")]
    pub path: PathBuf,

    /// Field within that file
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Environment variable consulted when the file yields nothing
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("config/email_config.json")
}

fn default_key_field() -> String {
    "openai_api_key".to_string()
}

fn default_env_var() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
            key_field: default_key_field(),
            env_var: default_env_var(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json, pretty or compact
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for daily-rotated log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
