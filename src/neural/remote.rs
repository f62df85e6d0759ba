//! OpenAI-compatible HTTP backend for [`super::NeuralGenerator`].
//!
//! Only compiled with the `neural` feature. Runs requests on a small
//! current-thread `tokio` runtime owned by the generator instance, since
//! [`super::NeuralGenerator`] exposes a synchronous interface to keep the
//! worker pool's job-submission path free of an async runtime dependency.

use super::{GeneratorStats, NeuralGenerator};
use crate::error::{LlmError, Result};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::time::{Duration, Instant};

/// Default per-call timeout; the orchestrator may still enforce its own
/// outer job timeout independently.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Talks to an OpenAI-compatible chat-completions endpoint.
pub struct RemoteGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    runtime: tokio::runtime::Runtime,
    stats: GeneratorStats,
}

impl RemoteGenerator {
    /// Builds a generator targeting `endpoint` with `api_key`, defaulting
    /// to the `gpt-4o-mini`-class `model` name; override with
    /// [`RemoteGenerator::with_model`].
    ///
    /// # Panics
    ///
    /// Panics if the current-thread `tokio` runtime cannot be built,
    /// which only happens under extreme resource exhaustion.
    #[must_use]
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(endpoint)
            .with_api_key(api_key);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio current-thread runtime for the neural backend");
        Self {
            client: Client::with_config(config),
            model: "gpt-4o-mini".to_string(),
            runtime,
            stats: GeneratorStats::default(),
        }
    }

    /// Overrides the model identifier sent with each request.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn call(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::BackendFailure(e.to_string()))?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(max_tokens)
            .temperature(temperature)
            .messages([message.into()])
            .build()
            .map_err(|e| LlmError::BackendFailure(e.to_string()))?;

        let response = tokio::time::timeout(DEFAULT_TIMEOUT, self.client.chat().create(request))
            .await
            .map_err(|_| LlmError::Timeout(DEFAULT_TIMEOUT))?
            .map_err(|e| LlmError::BackendFailure(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::BackendFailure("empty completion".to_string()).into())
    }
}

impl NeuralGenerator for RemoteGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
        stop: Option<&[String]>,
    ) -> Result<String> {
        let _ = stop;
        let start = Instant::now();
        let result = self.runtime.block_on(self.call(prompt, max_tokens, temperature));
        self.stats.total_time += start.elapsed();
        if result.is_ok() {
            self.stats.calls += 1;
        }
        result
    }

    fn stats(&self) -> GeneratorStats {
        self.stats
    }
}
