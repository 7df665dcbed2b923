use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::TextGenerator;
use super::error::{GenerationError, GenerationResult};

/// Scripted generator. Queued replies are served first, then the default reply.
pub struct MockGenerator {
    model: String,
    default_reply: Mutex<Option<String>>,
    queued: Mutex<VecDeque<GenerationResult<String>>>,
    prompts: Mutex<Vec<String>>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            default_reply: Mutex::new(None),
            queued: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
        }
    }

    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        let generator = Self::new();
        generator.set_reply(reply);
        generator
    }

    pub fn set_reply(&self, reply: impl Into<String>) {
        if let Ok(mut slot) = self.default_reply.lock() {
            *slot = Some(reply.into());
        }
    }

    /// Queues one result served before the default reply.
    pub fn push(&self, result: GenerationResult<String>) {
        if let Ok(mut queue) = self.queued.lock() {
            queue.push_back(result);
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    fn failure(&self, message: &str) -> GenerationError {
        GenerationError::RequestFailed {
            model: self.model.clone(),
            message: message.to_string(),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(self.failure("injected failure"));
        }

        let queued = self
            .queued
            .lock()
            .map_err(|_| self.failure("lock poisoned"))?
            .pop_front();
        if let Some(result) = queued {
            return result;
        }

        self.default_reply
            .lock()
            .map_err(|_| self.failure("lock poisoned"))?
            .clone()
            .ok_or_else(|| self.failure("no reply configured"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
