//! Judge model implementations.

pub mod mock;
pub mod openai;

pub use mock::{MockJudge, MockReply};
pub use openai::{OpenAiJudge, OpenAiJudgeConfig};
