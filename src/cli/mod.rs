//! Command-line interface.

pub mod commands;
pub mod display;
pub mod progress;
pub mod types;

pub use types::{Cli, Commands};

/// Print an error chain in the selected output mode.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "error",
                "error": err.to_string(),
                "causes": chain.get(1..).unwrap_or_default(),
            }))
            .unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
}
