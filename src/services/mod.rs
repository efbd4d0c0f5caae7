//! Application services: judging and benchmark orchestration.

pub mod benchmark_service;
pub mod judge_service;

pub use benchmark_service::BenchmarkService;
pub use judge_service::{parse_judge_response, strip_code_fences, JudgeFailure, JudgeService};
