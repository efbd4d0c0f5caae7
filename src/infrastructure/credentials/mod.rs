//! Judge credential resolution.
//!
//! The API key is read from a field of a JSON file, falling back to an
//! environment variable. The key itself never reaches logs.

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::models::CredentialsConfig;

/// Credential lookup failures. Any of these aborts a benchmark run.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("{field} not found in {path} and {env_var} is not set")]
    NotFound {
        field: String,
        path: PathBuf,
        env_var: String,
    },
}

/// Resolves the judge API key from the configured sources.
#[derive(Debug, Clone)]
pub struct CredentialLoader {
    path: PathBuf,
    key_field: String,
    env_var: String,
}

impl CredentialLoader {
    pub fn new(config: &CredentialsConfig) -> Self {
        Self {
            path: config.path.clone(),
            key_field: config.key_field.clone(),
            env_var: config.env_var.clone(),
        }
    }

    /// The API key, trimmed and non-empty.
    pub fn load(&self) -> Result<String, CredentialError> {
        if let Some(key) = self.from_file() {
            debug!(path = %self.path.display(), key = %redact(&key), "credential loaded from file");
            return Ok(key);
        }

        if let Some(key) = non_empty(std::env::var(&self.env_var).ok()) {
            debug!(env_var = %self.env_var, key = %redact(&key), "credential loaded from environment");
            return Ok(key);
        }

        Err(CredentialError::NotFound {
            field: self.key_field.clone(),
            path: self.path.clone(),
            env_var: self.env_var.clone(),
        })
    }

    fn from_file(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "credential file unavailable");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => non_empty(
                doc.get(&self.key_field)
                    .and_then(Value::as_str)
                    .map(str::to_string),
            ),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "credential file is not valid JSON");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loggable form of a secret: first four characters, then an ellipsis.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{prefix}...")
    }
}
