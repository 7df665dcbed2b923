use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::TextGenerator;
use super::error::{GenerationError, GenerationResult};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;

/// Text generation through the `genai` client. Model names without a provider prefix
/// resolve to a local Ollama server.
pub struct GenaiGenerator {
    client: Client,
    model: String,
    options: ChatOptions,
}

impl GenaiGenerator {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_client(Client::default(), model)
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            options: ChatOptions::default()
                .with_temperature(DEFAULT_TEMPERATURE)
                .with_top_p(DEFAULT_TOP_P),
        }
    }
}

#[async_trait]
impl TextGenerator for GenaiGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&self.options))
            .await
            .map_err(|e| GenerationError::RequestFailed {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse {
                model: self.model.clone(),
            });
        }

        debug!(model = %self.model, response_len = text.len(), "Generation complete");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
