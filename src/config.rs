//! Environment-driven defaults for the CLI's ambient tunables.
//!
//! Every tunable is resolved CLI-flag → environment variable → built-in
//! default, the same resolution chain used elsewhere in this codebase
//! for layered configuration. Unlike the Python original's
//! `ConfigManager`, this never reads a structured config file.

use std::path::PathBuf;

const ENV_OUTPUT_DIR: &str = "CREDENTIALFORGE_OUTPUT_DIR";
const ENV_CACHE_DIR: &str = "CREDENTIALFORGE_CACHE_DIR";
const ENV_LOG_DIR: &str = "CREDENTIALFORGE_LOG_DIR";
const ENV_MODEL_DIR: &str = "CREDENTIALFORGE_MODEL_DIR";
const ENV_SSL_VERIFY: &str = "CREDENTIALFORGE_SSL_VERIFY";
const ENV_CA_BUNDLE: &str = "CREDENTIALFORGE_CA_BUNDLE";
const ENV_HTTP_PROXY: &str = "HTTP_PROXY";
const ENV_HTTPS_PROXY: &str = "HTTPS_PROXY";
const ENV_NO_PROXY: &str = "NO_PROXY";
const ENV_TRUSTED_HOSTS: &str = "CREDENTIALFORGE_TRUSTED_HOSTS";
const ENV_THREADS: &str = "CREDENTIALFORGE_LLM_THREADS";
const ENV_CTX: &str = "CREDENTIALFORGE_LLM_CTX";
const ENV_TEMPERATURE: &str = "CREDENTIALFORGE_LLM_TEMPERATURE";
const ENV_NEURAL_ENDPOINT: &str = "CREDENTIALFORGE_NEURAL_ENDPOINT";
const ENV_NEURAL_API_KEY: &str = "CREDENTIALFORGE_NEURAL_API_KEY";

const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_CACHE_DIR: &str = "./cache";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_MODEL_DIR: &str = "./models";
const DEFAULT_THREADS: u32 = 4;
const DEFAULT_CTX: u32 = 2048;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Resolved network settings for the optional neural backend.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Whether to verify TLS certificates on outbound requests.
    pub ssl_verify: bool,
    /// Path to a custom CA bundle, if configured.
    pub ca_bundle_path: Option<PathBuf>,
    /// HTTP proxy URL, if configured.
    pub http_proxy: Option<String>,
    /// HTTPS proxy URL, if configured.
    pub https_proxy: Option<String>,
    /// Comma-separated no-proxy host list, as a single string.
    pub no_proxy: Option<String>,
    /// Hosts exempt from proxying regardless of the above.
    pub trusted_hosts: Vec<String>,
}

impl NetworkConfig {
    /// Resolves network settings from their environment variables,
    /// falling back to permissive defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ssl_verify: std::env::var(ENV_SSL_VERIFY)
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
                .unwrap_or(true),
            ca_bundle_path: std::env::var(ENV_CA_BUNDLE).ok().map(PathBuf::from),
            http_proxy: std::env::var(ENV_HTTP_PROXY).ok(),
            https_proxy: std::env::var(ENV_HTTPS_PROXY).ok(),
            no_proxy: std::env::var(ENV_NO_PROXY).ok(),
            trusted_hosts: std::env::var(ENV_TRUSTED_HOSTS)
                .map(|v| v.split(',').map(|h| h.trim().to_string()).filter(|h| !h.is_empty()).collect())
                .unwrap_or_default(),
        }
    }
}

/// Resolved neural-backend tuning knobs.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Worker thread count hint passed to the backend, if it supports one.
    pub n_threads: u32,
    /// Context window size hint.
    pub n_ctx: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl LlmConfig {
    /// Resolves LLM tuning knobs from their environment variables,
    /// falling back to built-in defaults on a missing or unparsable value.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            n_threads: env_parsed(ENV_THREADS).unwrap_or(DEFAULT_THREADS),
            n_ctx: env_parsed(ENV_CTX).unwrap_or(DEFAULT_CTX),
            temperature: env_parsed(ENV_TEMPERATURE).unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

/// Directory defaults, each resolved CLI-flag → env-var → built-in
/// default. Callers pass the CLI-flag value (if any) as `override_path`.
#[must_use]
pub fn output_dir(override_path: Option<&PathBuf>) -> PathBuf {
    resolve_dir(override_path, ENV_OUTPUT_DIR, DEFAULT_OUTPUT_DIR)
}

/// Resolves the cache directory.
#[must_use]
pub fn cache_dir(override_path: Option<&PathBuf>) -> PathBuf {
    resolve_dir(override_path, ENV_CACHE_DIR, DEFAULT_CACHE_DIR)
}

/// Resolves the log directory.
#[must_use]
pub fn log_dir(override_path: Option<&PathBuf>) -> PathBuf {
    resolve_dir(override_path, ENV_LOG_DIR, DEFAULT_LOG_DIR)
}

/// Resolves the downloaded-model directory.
#[must_use]
pub fn model_dir(override_path: Option<&PathBuf>) -> PathBuf {
    resolve_dir(override_path, ENV_MODEL_DIR, DEFAULT_MODEL_DIR)
}

/// Resolved remote neural backend credentials, or `None` if no endpoint
/// is configured.
#[derive(Debug, Clone)]
pub struct NeuralCredentials {
    /// Base URL of the OpenAI-compatible endpoint.
    pub endpoint: String,
    /// API key sent with each request.
    pub api_key: String,
}

/// Resolves the neural backend's endpoint/API key from their environment
/// variables. Returns `None` if the endpoint is unset, since a key with
/// no endpoint (or vice versa) is not enough to reach a backend.
#[must_use]
pub fn neural_credentials() -> Option<NeuralCredentials> {
    let endpoint = std::env::var(ENV_NEURAL_ENDPOINT).ok()?;
    let api_key = std::env::var(ENV_NEURAL_API_KEY).unwrap_or_default();
    Some(NeuralCredentials { endpoint, api_key })
}

fn resolve_dir(override_path: Option<&PathBuf>, env_var: &str, default: &str) -> PathBuf {
    override_path
        .cloned()
        .or_else(|| std::env::var(env_var).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_falls_back_to_default_when_unset_and_no_override() {
        assert_eq!(output_dir(None), PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn output_dir_prefers_explicit_override_over_default() {
        let explicit = PathBuf::from("/tmp/explicit-out");
        assert_eq!(output_dir(Some(&explicit)), explicit);
    }

    #[test]
    fn network_config_defaults_to_ssl_verification_enabled() {
        // SAFETY-independent: we don't touch process env here, so this
        // only holds when the variable truly isn't set in the test env.
        if std::env::var(ENV_SSL_VERIFY).is_err() {
            assert!(NetworkConfig::from_env().ssl_verify);
        }
    }

    #[test]
    fn llm_config_has_sane_built_in_defaults() {
        if std::env::var(ENV_THREADS).is_err() {
            assert_eq!(LlmConfig::from_env().n_threads, DEFAULT_THREADS);
        }
    }
}
