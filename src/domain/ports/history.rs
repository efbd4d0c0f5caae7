//! History store port.

use std::path::Path;

use crate::domain::errors::DomainResult;
use crate::domain::models::{BenchmarkRun, HistoryLog};

/// Persistence for the sequence of benchmark runs.
pub trait HistoryStore: Send + Sync {
    /// Where the history lives, for the report footer.
    fn location(&self) -> &Path;

    /// Read every stored run. A missing or unreadable document is an empty log.
    fn load(&self) -> HistoryLog;

    /// Replace the stored document with `log`.
    fn save(&self, log: &HistoryLog) -> DomainResult<()>;

    /// Load, push `run`, save. Returns the log that was written.
    fn append(&self, run: BenchmarkRun) -> DomainResult<HistoryLog> {
        let mut log = self.load();
        log.push(run);
        self.save(&log)?;
        Ok(log)
    }
}
