use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::agent::validate_agents;
use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty, compact")]
    InvalidLogFormat(String),

    #[error("Judge base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Judge model cannot be empty")]
    EmptyModel,

    #[error("Invalid {field}: {value}. Must be at least 1")]
    ZeroLimit { field: &'static str, value: u64 },

    #[error("History path cannot be empty")]
    EmptyHistoryPath,

    #[error("Credential key_field cannot be empty")]
    EmptyKeyField,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .agent-bench/config.yaml (project config)
    /// 3. .agent-bench/local.yaml (local overrides, optional)
    /// 4. Environment variables (AGENT_BENCH_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::extract(Self::figment(None))
    }

    /// Load defaults, then `path` in place of the project files, then env.
    pub fn load_with(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }
        Self::extract(Self::figment(path))
    }

    /// Load configuration from a specific file, ignoring project files and env
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(explicit: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let figment = match explicit {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment
                .merge(Yaml::file(".agent-bench/config.yaml"))
                .merge(Yaml::file(".agent-bench/local.yaml")),
        };

        figment.merge(Env::prefixed("AGENT_BENCH_").split("__"))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty", "compact"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.judge.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.judge.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        let limits = [
            ("judge.max_tokens", u64::from(config.judge.max_tokens)),
            ("judge.timeout_secs", config.judge.timeout_secs),
            ("judge.max_output_chars", config.judge.max_output_chars as u64),
            ("runner.timeout_secs", config.runner.timeout_secs),
        ];
        for (field, value) in limits {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { field, value });
            }
        }

        if config.history.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyHistoryPath);
        }
        if config.credentials.key_field.trim().is_empty() {
            return Err(ConfigError::EmptyKeyField);
        }

        validate_agents(&config.agents).map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;

        Ok(())
    }
}
