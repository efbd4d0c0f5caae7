//! Infrastructure layer module
//!
//! External integrations that are not port adapters:
//! - Configuration management
//! - Credential resolution
//! - Logging infrastructure

pub mod config;
pub mod credentials;
pub mod logging;
