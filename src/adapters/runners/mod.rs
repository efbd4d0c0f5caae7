//! Agent runner implementations.

pub mod process;

pub use process::{ProcessRunner, ProcessRunnerConfig};
