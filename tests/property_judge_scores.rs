use agent_bench::services::parse_judge_response;
use agent_bench::{Dimension, Score, ScoreRecord};
use proptest::prelude::*;

fn expected_overall(record: &ScoreRecord) -> f64 {
    let sum: u32 = record.scores().iter().map(|(_, s)| u32::from(s.value())).sum();
    (f64::from(sum) / 5.0 * 10.0).round() / 10.0
}

proptest! {
    /// Property: any integer the judge returns lands in 1..=5
    #[test]
    fn prop_scores_always_in_bounds(values in proptest::collection::vec(any::<i64>(), 5)) {
        let scores: serde_json::Map<String, serde_json::Value> = Dimension::ALL
            .iter()
            .zip(&values)
            .map(|(d, v)| (d.key().to_string(), serde_json::json!(v)))
            .collect();
        let reply = serde_json::json!({"scores": scores, "summary": "s"}).to_string();

        let record = parse_judge_response(&reply).unwrap();
        for ((_, score), raw) in record.scores().iter().zip(&values) {
            prop_assert!((1..=5).contains(&score.value()));
            prop_assert_eq!(score, Score::clamped(*raw));
        }
    }

    /// Property: overall is always the rounded mean of the five scores
    #[test]
    fn prop_overall_matches_scores(
        values in proptest::collection::vec(proptest::option::of(-3i64..9), 5)
    ) {
        let mut scores = serde_json::Map::new();
        for (d, v) in Dimension::ALL.iter().zip(&values) {
            if let Some(v) = v {
                scores.insert(d.key().to_string(), serde_json::json!(v));
            }
        }
        let reply = serde_json::json!({"scores": scores}).to_string();

        let record = parse_judge_response(&reply).unwrap();
        prop_assert!((record.overall() - expected_overall(&record)).abs() < 1e-9);
        prop_assert!((1.0..=5.0).contains(&record.overall()));
    }

    /// Property: arbitrary text never panics the parser
    #[test]
    fn prop_arbitrary_reply_never_panics(reply in ".{0,200}") {
        let _ = parse_judge_response(&reply);
    }

    /// Property: a persisted record re-derives the same overall
    #[test]
    fn prop_record_round_trips(values in proptest::collection::vec(1i64..=5, 5)) {
        let scores: serde_json::Map<String, serde_json::Value> = Dimension::ALL
            .iter()
            .zip(&values)
            .map(|(d, v)| (d.key().to_string(), serde_json::json!(v)))
            .collect();
        let reply = serde_json::json!({"scores": scores, "summary": "ok"}).to_string();
        let record = parse_judge_response(&reply).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let back: ScoreRecord = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, record);
    }
}
