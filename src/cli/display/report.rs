//! Terminal renderers for benchmark results, history and the agent catalog.

use chrono::{DateTime, Local};
use std::path::Path;

use super::table::list_table;
use crate::domain::models::{AgentRegistry, BenchmarkRun, Dimension, ScoreRecord};

const RULE_WIDTH: usize = 60;

/// Title block printed before a run.
pub fn banner(now: &DateTime<Local>) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    format!(
        "{rule}\n  AGENT BENCHMARK — LLM-as-Judge\n  {}\n{rule}",
        now.format("%A, %B %d %Y  %H:%M")
    )
}

/// One finished agent, as shown while the benchmark runs.
pub fn progress_line(label: &str, record: &ScoreRecord) -> String {
    format!(
        "  {label:<22} ✓ captured → {} {:.1}",
        record.tier().indicator(),
        record.overall()
    )
}

fn overall_cell(record: &ScoreRecord) -> String {
    format!("{} {:.1}", record.tier().indicator(), record.overall())
}

/// Score table, per-agent summaries and the history location.
///
/// Rows follow registry order; agents absent from `run` are skipped.
pub fn render_report(registry: &AgentRegistry, run: &BenchmarkRun, saved_to: &Path) -> String {
    format!(
        "{}\n  Saved → {}",
        score_sections(registry, run),
        saved_to.display()
    )
}

/// Same as [`render_report`], with a footer saying the run was not saved.
pub fn render_unsaved_report(
    registry: &AgentRegistry,
    run: &BenchmarkRun,
    saved_to: &Path,
    error: &str,
) -> String {
    format!(
        "{}\n  [!] Not saved to {}: {error}",
        score_sections(registry, run),
        saved_to.display()
    )
}

fn score_sections(registry: &AgentRegistry, run: &BenchmarkRun) -> String {
    let mut headers = vec!["Agent", "Overall"];
    headers.extend(Dimension::ALL.iter().map(|d| d.column()));
    let mut table = list_table(&headers, &[1, 2, 3, 4, 5, 6]);

    let scored: Vec<_> = registry
        .iter()
        .filter_map(|agent| run.get(&agent.key).map(|record| (agent, record)))
        .collect();

    for (agent, record) in &scored {
        let mut row = vec![agent.label.clone(), overall_cell(record)];
        row.extend(record.scores().iter().map(|(_, score)| score.to_string()));
        table.add_row(row);
    }

    let mut out = vec![table.to_string(), String::new()];
    out.extend(
        scored
            .iter()
            .map(|(agent, record)| format!("  {}: {}", agent.label, record.summary())),
    );
    out.push(String::new());
    out.join("\n")
}

/// Trend table of the most recent `limit` runs, oldest first.
pub fn render_history(registry: &AgentRegistry, runs: &[BenchmarkRun], limit: usize) -> String {
    if runs.is_empty() {
        return "No benchmark runs recorded.".to_string();
    }
    let recent = &runs[runs.len().saturating_sub(limit)..];

    let mut headers = vec!["Run"];
    headers.extend(registry.iter().map(|agent| agent.label.as_str()));
    headers.push("Mean");
    let right: Vec<usize> = (1..headers.len()).collect();
    let mut table = list_table(&headers, &right);

    for run in recent {
        let mut row = vec![short_timestamp(&run.timestamp)];
        row.extend(registry.iter().map(|agent| {
            run.get(&agent.key)
                .map_or_else(|| "-".to_string(), overall_cell)
        }));
        row.push(
            run.mean_overall()
                .map_or_else(|| "-".to_string(), |mean| format!("{mean:.1}")),
        );
        table.add_row(row);
    }

    format!(
        "Showing {} of {} run(s)\n\n{table}",
        recent.len(),
        runs.len()
    )
}

/// The agent catalog in execution order.
pub fn render_agents(registry: &AgentRegistry) -> String {
    let mut table = list_table(&["Key", "Label", "Timeout", "Command"], &[]);
    for agent in registry.iter() {
        table.add_row(vec![
            agent.key.clone(),
            agent.label.clone(),
            agent
                .timeout_secs
                .map_or_else(|| "default".to_string(), |secs| format!("{secs}s")),
            agent.command.join(" "),
        ]);
    }
    format!("{} agent(s):\n\n{table}", registry.len())
}

fn short_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
