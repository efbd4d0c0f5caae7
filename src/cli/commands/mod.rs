//! CLI command implementations.

pub mod agents;
pub mod history;
pub mod run;
