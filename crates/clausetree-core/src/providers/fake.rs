use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TextGenerator;

/// Replays canned responses. With a queue, responses are returned in order
/// and the last one repeats once the queue drains.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    fixed_response: Option<String>,
    queue: Mutex<VecDeque<String>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn with_queue<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(responses.into_iter().map(Into::into).collect()),
            ..self
        }
    }

    /// Fail every call with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of generation calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate_syntax_analysis(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }

        let mut queue = self.queue.lock().await;
        if queue.len() > 1 {
            if let Some(next) = queue.pop_front() {
                return Ok(next);
            }
        }
        if let Some(last) = queue.front() {
            return Ok(last.clone());
        }
        drop(queue);

        self.fixed_response
            .clone()
            .ok_or_else(|| anyhow::anyhow!("fake generator has no response configured"))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
