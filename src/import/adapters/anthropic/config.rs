//! Environment-driven configuration for the classification call.

use std::env;
use std::time::Duration;

/// Model used when no override is configured.
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Request timeout used when no override is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Completion budget for the verdict array.
const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Configuration for the Anthropic classification call.
///
/// The credential is optional: running without one is the defined
/// degraded mode in which every candidate imports as non-duplicate, not a
/// configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    api_key: Option<String>,
    model: String,
    timeout: Duration,
    max_tokens: u32,
}

impl ClassifierConfig {
    /// Reads configuration from the environment: `ANTHROPIC_API_KEY`,
    /// `TABLON_CLASSIFIER_MODEL`, and `TABLON_CLASSIFIER_TIMEOUT_SECS`.
    /// Blank values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let model = env::var("TABLON_CLASSIFIER_MODEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let timeout_secs = env::var("TABLON_CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Creates a configuration without a credential (degraded mode).
    #[must_use]
    pub fn without_credential() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Returns the configured credential, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the completion token budget.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
