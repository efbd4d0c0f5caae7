//! Display framework for CLI output formatting.
//!
//! Every report is built as a plain `String` by a pure function so the same
//! inputs always render the same text.

pub mod report;
pub mod table;

use serde::Serialize;

pub use report::{
    banner, progress_line, render_agents, render_history, render_report, render_unsaved_report,
};
pub use table::list_table;

/// Trait for types that can be rendered as human-readable or JSON output.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

/// Dispatch output based on JSON mode flag.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}
