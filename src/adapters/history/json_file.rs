//! JSON document history store.
//!
//! The whole history is one pretty-printed JSON array. Saves go through a
//! temp file in the same directory followed by a rename, so a crash mid-write
//! leaves the previous document intact. Loading is tolerant: entries that
//! cannot be read are skipped, and before such a document is overwritten it
//! is moved aside to a `.bak` file next to it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{BenchmarkRun, HistoryLog};
use crate::domain::ports::HistoryStore;

/// History persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

/// Runs read from a document, plus how many entries had to be dropped.
struct ParsedLog {
    runs: HistoryLog,
    dropped: usize,
}

fn parse_log(raw: &str) -> Result<ParsedLog, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = entries.len();
    let runs: HistoryLog = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<BenchmarkRun>(entry)
                .map_err(|e| warn!(index, error = %e, "skipping unreadable history entry"))
                .ok()
        })
        .collect();
    Ok(ParsedLog {
        dropped: total - runs.len(),
        runs,
    })
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn persistence_error(&self, reason: impl ToString) -> DomainError {
        DomainError::PersistenceFailed {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Move the current document aside if `load` could not read all of it.
    ///
    /// A document that exists but cannot be read at all blocks the save.
    fn preserve_unreadable(&self) -> DomainResult<()> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(self.persistence_error(format!("cannot read existing history: {e}")))
            }
        };

        let lossless = std::str::from_utf8(&bytes).is_ok_and(|raw| {
            raw.trim().is_empty() || parse_log(raw).is_ok_and(|parsed| parsed.dropped == 0)
        });
        if lossless {
            return Ok(());
        }

        let name = self
            .path
            .file_name()
            .map_or_else(|| "history".to_string(), |n| n.to_string_lossy().into_owned());
        let (_, backup) = Builder::new()
            .prefix(&format!("{name}."))
            .suffix(".bak")
            .tempfile_in(self.dir())
            .and_then(|tmp| tmp.keep().map_err(|e| e.error))
            .map_err(|e| self.persistence_error(e))?;
        fs::rename(&self.path, &backup).map_err(|e| self.persistence_error(e))?;

        warn!(
            path = %self.path.display(),
            backup = %backup.display(),
            "history had unreadable content, kept a backup"
        );
        Ok(())
    }
}

impl HistoryStore for JsonFileHistoryStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HistoryLog {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "history unreadable, starting empty");
                return Vec::new();
            }
        };

        match parse_log(&raw) {
            Ok(parsed) => {
                if parsed.dropped > 0 {
                    warn!(dropped = parsed.dropped, "some history entries were skipped");
                }
                debug!(runs = parsed.runs.len(), "history loaded");
                parsed.runs
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "history unparsable, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, log: &HistoryLog) -> DomainResult<()> {
        let dir = self.dir();
        fs::create_dir_all(&dir).map_err(|e| self.persistence_error(e))?;

        let json = serde_json::to_string_pretty(log)?;
        self.preserve_unreadable()?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.persistence_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.persistence_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.persistence_error(e.error))?;

        debug!(runs = log.len(), path = %self.path.display(), "history saved");
        Ok(())
    }
}
