//! Bounded judge scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary used when the agent never produced anything worth judging.
pub const AGENT_FAILED_SUMMARY: &str = "Agent failed to run or produced no output.";

/// Summary used when the judge (or a stored record) gives none.
pub const MISSING_SUMMARY: &str = "No summary.";

/// One of the five fixed scoring axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Completeness,
    DataQuality,
    Relevance,
    Clarity,
    ErrorFree,
}

impl Dimension {
    /// All dimensions in report column order.
    pub const ALL: [Self; 5] = [
        Self::Completeness,
        Self::DataQuality,
        Self::Relevance,
        Self::Clarity,
        Self::ErrorFree,
    ];

    /// Key used in judge responses and the history document.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::DataQuality => "data_quality",
            Self::Relevance => "relevance",
            Self::Clarity => "clarity",
            Self::ErrorFree => "error_free",
        }
    }

    /// Short column header for the terminal table.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Completeness => "Compl.",
            Self::DataQuality => "Quality",
            Self::Relevance => "Relev.",
            Self::Clarity => "Clarity",
            Self::ErrorFree => "No-Err",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A dimension score, always within `1..=5`.
///
/// Deserialization never fails on a number or a string: values are coerced
/// and clamped the same way judge replies are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "StoredScore", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);
    /// Value assumed when the judge omits a dimension.
    pub const NEUTRAL: Self = Self(3);

    /// Clamp any integer into the valid range.
    pub fn clamped(value: i64) -> Self {
        // 1..=5 always fits in u8
        Self(value.clamp(1, 5) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Any score shape found in a history document.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl From<StoredScore> for Score {
    fn from(stored: StoredScore) -> Self {
        match stored {
            StoredScore::Int(n) => Self::clamped(n),
            // Saturating cast; NaN becomes 0 and clamps to MIN
            StoredScore::Float(f) => Self::clamped(f.trunc() as i64),
            StoredScore::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().map(|f| f.trunc() as i64))
                    .map_or(Self::NEUTRAL, Self::clamped)
            }
            StoredScore::Other(_) => Self::NEUTRAL,
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five dimension scores for one agent.
///
/// Unknown keys are ignored and missing ones read as [`Score::NEUTRAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct DimensionScores {
    pub completeness: Score,
    pub data_quality: Score,
    pub relevance: Score,
    pub clarity: Score,
    pub error_free: Score,
}

impl Default for DimensionScores {
    fn default() -> Self {
        Self::uniform(Score::NEUTRAL)
    }
}

impl DimensionScores {
    /// Every dimension set to the same score.
    pub const fn uniform(score: Score) -> Self {
        Self {
            completeness: score,
            data_quality: score,
            relevance: score,
            clarity: score,
            error_free: score,
        }
    }

    /// Build from a per-dimension lookup.
    pub fn from_fn(mut f: impl FnMut(Dimension) -> Score) -> Self {
        Self {
            completeness: f(Dimension::Completeness),
            data_quality: f(Dimension::DataQuality),
            relevance: f(Dimension::Relevance),
            clarity: f(Dimension::Clarity),
            error_free: f(Dimension::ErrorFree),
        }
    }

    pub const fn get(&self, dimension: Dimension) -> Score {
        match dimension {
            Dimension::Completeness => self.completeness,
            Dimension::DataQuality => self.data_quality,
            Dimension::Relevance => self.relevance,
            Dimension::Clarity => self.clarity,
            Dimension::ErrorFree => self.error_free,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, Score)> + '_ {
        Dimension::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// Mean of the five scores, rounded to one decimal place.
    pub fn overall(&self) -> f64 {
        let sum: u32 = self.iter().map(|(_, s)| u32::from(s.value())).sum();
        round_one_decimal(f64::from(sum) / Dimension::ALL.len() as f64)
    }
}

/// Round half away from zero to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Three-tier indicator keyed to an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Good,
    Borderline,
    Bad,
}

impl ScoreTier {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 4.0 {
            Self::Good
        } else if overall >= 3.0 {
            Self::Borderline
        } else {
            Self::Bad
        }
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Good => "🟢",
            Self::Borderline => "🟡",
            Self::Bad => "🔴",
        }
    }
}

/// Judged result for one agent in one run.
///
/// `overall` is derived from the scores on construction and again on
/// deserialization, so it can never disagree with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScoreRecordRepr", into = "ScoreRecordRepr")]
pub struct ScoreRecord {
    scores: DimensionScores,
    overall: f64,
    summary: String,
}

impl ScoreRecord {
    pub fn new(scores: DimensionScores, summary: impl Into<String>) -> Self {
        Self {
            overall: scores.overall(),
            scores,
            summary: summary.into(),
        }
    }

    /// All ones with the given diagnostic summary.
    pub fn failed(summary: impl Into<String>) -> Self {
        Self::new(DimensionScores::uniform(Score::MIN), summary)
    }

    /// Record used when the agent itself failed.
    pub fn agent_failed() -> Self {
        Self::failed(AGENT_FAILED_SUMMARY)
    }

    pub const fn scores(&self) -> &DimensionScores {
        &self.scores
    }

    pub const fn overall(&self) -> f64 {
        self.overall
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_overall(self.overall)
    }
}

#[derive(Serialize, Deserialize)]
struct ScoreRecordRepr {
    #[serde(default)]
    scores: DimensionScores,
    #[serde(skip_deserializing)]
    overall: f64,
    #[serde(default = "missing_summary", deserialize_with = "summary_text")]
    summary: String,
}

fn missing_summary() -> String {
    MISSING_SUMMARY.to_string()
}

/// Strings pass through, `null` reads as missing, anything else is kept as
/// its JSON text.
fn summary_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => missing_summary(),
        other => other.to_string(),
    })
}

impl From<ScoreRecordRepr> for ScoreRecord {
    fn from(repr: ScoreRecordRepr) -> Self {
        Self::new(repr.scores, repr.summary)
    }
}

impl From<ScoreRecord> for ScoreRecordRepr {
    fn from(record: ScoreRecord) -> Self {
        Self {
            scores: record.scores,
            overall: record.overall,
            summary: record.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(Score::clamped(0).value(), 1);
        assert_eq!(Score::clamped(9).value(), 5);
        assert_eq!(Score::clamped(-100).value(), 1);
        assert_eq!(Score::clamped(4).value(), 4);
    }

    #[test]
    fn test_overall_rounding() {
        let scores = DimensionScores {
            completeness: Score::clamped(5),
            data_quality: Score::clamped(5),
            relevance: Score::clamped(4),
            clarity: Score::clamped(5),
            error_free: Score::clamped(5),
        };
        assert!((scores.overall() - 4.8).abs() < f64::EPSILON);
        assert_eq!(ScoreTier::from_overall(scores.overall()), ScoreTier::Good);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ScoreTier::from_overall(4.0), ScoreTier::Good);
        assert_eq!(ScoreTier::from_overall(3.9), ScoreTier::Borderline);
        assert_eq!(ScoreTier::from_overall(3.0), ScoreTier::Borderline);
        assert_eq!(ScoreTier::from_overall(2.8), ScoreTier::Bad);
        assert_eq!(ScoreTier::Bad.indicator(), "🔴");
    }

    #[test]
    fn test_failed_record() {
        let record = ScoreRecord::agent_failed();
        assert!(record.scores().iter().all(|(_, s)| s == Score::MIN));
        assert!((record.overall() - 1.0).abs() < f64::EPSILON);
        assert_eq!(record.summary(), AGENT_FAILED_SUMMARY);
    }

    #[test]
    fn test_serialized_shape() {
        let record = ScoreRecord::new(DimensionScores::uniform(Score::NEUTRAL), "ok");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["scores"]["data_quality"], 3);
        assert_eq!(json["overall"], 3.0);
        assert_eq!(json["summary"], "ok");
    }

    #[test]
    fn test_deserialize_recomputes_overall() {
        let json = r#"{"scores":{"completeness":1,"data_quality":1,"relevance":1,"clarity":1,"error_free":1},"overall":4.9,"summary":"x"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert!((record.overall() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_clamps_out_of_range() {
        let json = r#"{"scores":{"completeness":0,"data_quality":9,"relevance":"4","clarity":2.7,"error_free":5},"overall":1.0,"summary":"x"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        let values: Vec<u8> = record.scores().iter().map(|(_, s)| s.value()).collect();
        assert_eq!(values, vec![1, 5, 4, 2, 5]);
    }

    #[test]
    fn test_deserialize_ignores_extra_score_keys() {
        let json = r#"{"scores":{"completeness":4,"data_quality":4,"relevance":4,"clarity":4,"error_free":4,"actionability":2},"overall":4.0,"summary":"x"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert!((record.overall() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_fills_missing_parts() {
        let json = r#"{"scores":{"completeness":5,"clarity":null}}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.scores().completeness, Score::MAX);
        assert_eq!(record.scores().clarity, Score::NEUTRAL);
        assert_eq!(record.scores().relevance, Score::NEUTRAL);
        assert_eq!(record.summary(), MISSING_SUMMARY);
    }

    #[test]
    fn test_deserialize_keeps_non_string_summary() {
        let json = r#"{"scores":{},"summary":{"note":"ok"}}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.summary(), r#"{"note":"ok"}"#);
    }
}
