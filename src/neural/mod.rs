//! Neural generator adapter: an optional external text model behind a
//! narrow interface.
//!
//! Grounded in `examples/zircote-rlm-rs/src/embedding/mod.rs`'s `Embedder`
//! trait and feature-gated dual-factory (`create_embedder`). This module
//! mirrors that shape: [`NeuralGenerator`] is the trait, [`NullGenerator`]
//! is the always-unavailable default, and, behind the `neural` feature,
//! [`remote::RemoteGenerator`] talks to an OpenAI-compatible endpoint.

#[cfg(feature = "neural")]
mod remote;

#[cfg(feature = "neural")]
pub use remote::RemoteGenerator;

use crate::error::{LlmError, Result};
use std::time::Duration;

/// Running performance counters for a neural generator instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorStats {
    /// Total prompt+completion tokens across all calls (0 if unknown).
    pub total_tokens: u64,
    /// Total wall-clock time spent in `generate`/`generate_batch`.
    pub total_time: Duration,
    /// Total successful `generate` calls.
    pub calls: u64,
}

impl GeneratorStats {
    /// Average tokens per second across all recorded calls, or `0.0`
    /// when no time has been recorded yet.
    #[must_use]
    pub fn tokens_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_tokens as f64 / secs
        }
    }
}

/// A text-generation backend external to the deterministic template path.
///
/// Implementations need not be internally thread-safe; callers that share
/// one instance across workers must serialize access themselves (the
/// worker pool gives each worker its own instance instead, per §4.2).
pub trait NeuralGenerator {
    /// Generates one completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if the backend is unavailable, times out, or
    /// reports a failure.
    fn generate(
        &mut self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
        stop: Option<&[String]>,
    ) -> Result<String>;

    /// Generates one completion per prompt. The default implementation
    /// calls [`NeuralGenerator::generate`] sequentially; implementations
    /// may override this for true batch fan-out.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] under the same conditions as `generate`.
    fn generate_batch(
        &mut self,
        prompts: &[String],
        max_tokens: u32,
        temperature: f32,
    ) -> Vec<std::result::Result<String, LlmError>> {
        prompts
            .iter()
            .map(|p| match self.generate(p, max_tokens, temperature, None) {
                Ok(text) => Ok(text),
                Err(crate::error::Error::Llm(e)) => Err(e),
                Err(_) => Err(LlmError::BackendFailure("unexpected error category".to_string())),
            })
            .collect()
    }

    /// Releases backend resources. A no-op for stateless HTTP backends.
    fn unload(&mut self) {}

    /// Returns a snapshot of running performance counters.
    fn stats(&self) -> GeneratorStats {
        GeneratorStats::default()
    }
}

/// Always-unavailable generator. This is the default used whenever the
/// `neural` feature is off or no endpoint is configured; callers fall
/// back unconditionally to the template path in that case.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGenerator;

impl NeuralGenerator for NullGenerator {
    fn generate(
        &mut self,
        _prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
        _stop: Option<&[String]>,
    ) -> Result<String> {
        Err(LlmError::Unavailable.into())
    }
}

/// Creates the configured neural generator.
///
/// - With the `neural` feature and `endpoint`/`api_key` both set: returns
///   [`RemoteGenerator`], using `model` in place of its built-in default
///   when given.
/// - Otherwise: returns [`NullGenerator`], which always reports
///   unavailable.
#[must_use]
pub fn create_generator(endpoint: Option<&str>, api_key: Option<&str>, model: Option<&str>) -> Box<dyn NeuralGenerator> {
    #[cfg(feature = "neural")]
    {
        if let (Some(endpoint), Some(api_key)) = (endpoint, api_key) {
            let mut generator = RemoteGenerator::new(endpoint, api_key);
            if let Some(model) = model {
                generator = generator.with_model(model);
            }
            return Box::new(generator);
        }
    }
    #[cfg(not(feature = "neural"))]
    {
        let _ = (endpoint, api_key, model);
    }
    Box::new(NullGenerator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_generator_always_reports_unavailable() {
        let mut r#gen = NullGenerator;
        let err = r#gen.generate("prompt", 16, 0.7, None).unwrap_err();
        assert!(matches!(err, crate::error::Error::Llm(LlmError::Unavailable)));
    }

    #[test]
    fn default_batch_impl_collects_individual_results() {
        let mut r#gen = NullGenerator;
        let prompts = vec!["a".to_string(), "b".to_string()];
        let results = r#gen.generate_batch(&prompts, 16, 0.7);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(std::result::Result::is_err));
    }

    #[test]
    fn tokens_per_second_is_zero_with_no_elapsed_time() {
        let stats = GeneratorStats::default();
        assert_eq!(stats.tokens_per_second(), 0.0);
    }

    #[cfg(not(feature = "neural"))]
    #[test]
    fn create_generator_without_feature_is_always_null() {
        let mut r#gen = create_generator(Some("http://localhost"), Some("key"), None);
        assert!(r#gen.generate("p", 1, 0.0, None).is_err());
    }
}
