//! Mock judge for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::ports::{JudgeError, JudgeModel};

/// A scripted judge reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion
    Text(String),
    /// Fail the call as a transport error with this message
    Fail(String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// Judge that replays scripted replies and records every prompt.
///
/// Once the script is exhausted the default reply is used.
pub struct MockJudge {
    default_reply: MockReply,
    script: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockJudge {
    pub fn new(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Judge that always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::text(text))
    }

    /// Queue replies to be returned before the default.
    pub fn with_script(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.extend(replies);
        }
        self
    }

    /// Number of completed `complete` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl JudgeModel for MockJudge {
    fn model_id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let reply = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(JudgeError::Transport(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_default() {
        let judge = MockJudge::replying("default")
            .with_script([MockReply::text("first"), MockReply::fail("down")]);

        assert_eq!(judge.complete("a").await.unwrap(), "first");
        assert!(judge.complete("b").await.is_err());
        assert_eq!(judge.complete("c").await.unwrap(), "default");
        assert_eq!(judge.calls(), 3);
        assert_eq!(judge.prompts(), vec!["a", "b", "c"]);
    }
}
