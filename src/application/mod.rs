//! Application layer: wires adapters and services into a benchmark run.

pub mod harness;

pub use harness::{BenchmarkHarness, CompletedRun, HarnessOutcome};
