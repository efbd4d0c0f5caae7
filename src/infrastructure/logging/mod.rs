//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON, pretty or compact output on stderr
//! - Optional daily-rotated JSON log files

pub mod logger;

pub use logger::{LogFormat, LoggerImpl};
