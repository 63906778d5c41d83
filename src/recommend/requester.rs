use super::models::RecommendationRequest;
use super::prompt::build_prompt;
use crate::llm::{CompletionOptions, CompletionProvider, LlmError};
use std::sync::Arc;
use tracing::{debug, info};

/// Turns a [`RecommendationRequest`] into a raw model reply.
pub struct RecommendationRequester {
    provider: Arc<dyn CompletionProvider>,
    options: CompletionOptions,
}

impl RecommendationRequester {
    pub fn new(provider: Arc<dyn CompletionProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Runs one completion. No retries.
    pub async fn request(&self, request: &RecommendationRequest) -> Result<String, LlmError> {
        info!(
            provider = self.provider.name(),
            "Requesting recommendation for {}",
            request.summary()
        );
        let prompt = build_prompt(request);
        let reply = self.provider.complete(&prompt, &self.options).await?;
        debug!("Raw model reply: {}", reply);
        Ok(reply)
    }
}
