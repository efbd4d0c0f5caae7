//! Infrastructure adapters for external systems.

pub mod history;
pub mod judges;
pub mod runners;
