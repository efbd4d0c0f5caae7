//! LLM-as-judge scoring.
//!
//! Turns a run outcome into a bounded [`ScoreRecord`]. Failed runs are scored
//! locally without a judge call; judge replies are validated strictly and any
//! problem collapses into the all-ones record with a diagnostic summary.

use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::domain::models::{
    AgentDescriptor, Dimension, DimensionScores, RunOutcome, Score, ScoreRecord,
};
use crate::domain::ports::{JudgeError, JudgeModel};

pub use crate::domain::models::MISSING_SUMMARY;

/// Default number of output characters shown to the judge.
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 3000;

/// Why a judge reply could not be turned into a score record.
#[derive(Debug, Error)]
pub enum JudgeFailure {
    #[error(transparent)]
    Call(#[from] JudgeError),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("'scores' is not an object")]
    ScoresNotObject,

    #[error("score for {dimension} is not an integer: {value}")]
    NonIntegerScore { dimension: Dimension, value: String },

    #[error("'summary' is not a string")]
    InvalidSummary,
}

/// Scores agent outcomes with a judge model.
pub struct JudgeService {
    model: Arc<dyn JudgeModel>,
    max_output_chars: usize,
}

impl JudgeService {
    pub fn new(model: Arc<dyn JudgeModel>, max_output_chars: usize) -> Self {
        Self {
            model,
            max_output_chars,
        }
    }

    /// Score one agent's outcome. Never fails.
    #[instrument(skip(self, agent, outcome), fields(agent = %agent.key, model = self.model.model_id()))]
    pub async fn score(&self, agent: &AgentDescriptor, outcome: &RunOutcome) -> ScoreRecord {
        if outcome.is_failure() {
            debug!(failure = ?outcome.failure, "agent failed, skipping judge");
            return ScoreRecord::agent_failed();
        }

        let prompt = self.build_prompt(&agent.rubric, &outcome.captured_text);

        let judged = match self.model.complete(&prompt).await {
            Ok(raw) => parse_judge_response(&raw),
            Err(e) => Err(JudgeFailure::from(e)),
        };

        match judged {
            Ok(record) => {
                info!(overall = record.overall(), "agent scored");
                record
            }
            Err(failure) => {
                warn!(error = %failure, "judge scoring failed");
                ScoreRecord::failed(format!("Scoring call failed: {failure}"))
            }
        }
    }

    /// Judge prompt with the rubric verbatim and truncated agent output.
    pub fn build_prompt(&self, rubric: &str, output: &str) -> String {
        let output = truncate_chars(output, self.max_output_chars);
        format!(
            "You are an LLM-as-judge evaluating the output of an automated investment data agent.

## Agent Description
{rubric}

## Agent Output to Evaluate
```
{output}
```

## Scoring Task
Score this output on exactly 5 dimensions, each from 1 to 5:
- completeness  (1=missing key fields, 5=all expected fields present)
- data_quality  (1=wrong/invalid values or format, 5=values in expected ranges/format)
- relevance     (1=not actionable for investor, 5=clearly actionable insights)
- clarity       (1=hard to parse/poorly structured, 5=well-structured and readable)
- error_free    (1=exceptions/failures/fallback messages present, 5=clean successful run)

Respond with ONLY valid JSON — no markdown, no explanation, no code fences:
{{\"scores\": {{\"completeness\": N, \"data_quality\": N, \"relevance\": N, \"clarity\": N, \"error_free\": N}}, \"summary\": \"one sentence max 20 words\"}}
"
        )
    }
}

/// Validate a raw judge reply into a score record.
///
/// Missing dimensions count as 3, values are coerced to integers and clamped
/// into `1..=5`, and a missing summary becomes [`MISSING_SUMMARY`].
pub fn parse_judge_response(raw: &str) -> Result<ScoreRecord, JudgeFailure> {
    let body = strip_code_fences(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| JudgeFailure::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(JudgeFailure::NotAnObject)?;

    let empty = Map::new();
    let scores = match object.get("scores") {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => return Err(JudgeFailure::ScoresNotObject),
    };

    let mut values = [Score::NEUTRAL; 5];
    for (slot, dimension) in values.iter_mut().zip(Dimension::ALL) {
        if let Some(value) = scores.get(dimension.key()) {
            let n = coerce_integer(value).ok_or_else(|| JudgeFailure::NonIntegerScore {
                dimension,
                value: value.to_string(),
            })?;
            *slot = Score::clamped(n);
        }
    }
    let [completeness, data_quality, relevance, clarity, error_free] = values;
    let dimensions = DimensionScores {
        completeness,
        data_quality,
        relevance,
        clarity,
        error_free,
    };

    let summary = match object.get("summary") {
        None | Some(Value::Null) => MISSING_SUMMARY.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(JudgeFailure::InvalidSummary),
    };

    Ok(ScoreRecord::new(dimensions, summary))
}

/// Remove a surrounding markdown code fence, with or without a `json` tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let body = rest.split("```").next().unwrap_or(rest);
        let body = match body.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
            _ => body,
        };
        return body.trim();
    }

    text.strip_suffix("```").map_or(text, str::trim_end)
}

/// Integer view of a JSON score: integers as-is, floats truncated, numeric
/// strings parsed, booleans as 0/1.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
