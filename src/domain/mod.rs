//! Domain layer for the benchmark harness
//!
//! Pure models (agents, outcomes, scores, runs) and the port traits that
//! adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
