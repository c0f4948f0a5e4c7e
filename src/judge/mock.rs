use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::JudgeClient;
use super::error::TransportError;

/// Scripted behaviour of a [`MockJudgeClient`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(TransportError),
    /// Never answers; only a pool timeout ends the call.
    Hang,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub prompt: String,
    pub had_image: bool,
}

/// In-memory judge for tests.
#[derive(Debug, Clone)]
pub struct MockJudgeClient {
    reply: MockReply,
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockJudgeClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::Text(text.into()))
    }

    /// Replies with a well-formed verdict object.
    pub fn verdict(verdict: &str, confidence: f64) -> Self {
        Self::replying(
            serde_json::json!({
                "verdict": verdict,
                "confidence": confidence,
                "reason": "mock judge",
            })
            .to_string(),
        )
    }

    pub fn failing(error: TransportError) -> Self {
        Self::new(MockReply::Fail(error))
    }

    pub fn hanging() -> Self {
        Self::new(MockReply::Hang)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl JudgeClient for MockJudgeClient {
    async fn ask(&self, prompt: &str, image: Option<&[u8]>) -> Result<String, TransportError> {
        self.calls.lock().push(MockCall {
            prompt: prompt.to_string(),
            had_image: image.is_some(),
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(error) => Err(error.clone()),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
