//! HTTP classifier backed by the Anthropic Messages API.

use super::config::ClassifierConfig;
use super::payload::{Message, MessagesRequest, MessagesResponse, parse_verdicts};
use super::prompt::render_prompt;
use crate::import::domain::ImportCandidate;
use crate::import::ports::{ClassifierResponse, DuplicateClassifier};
use crate::task::domain::TaskSummary;
use async_trait::async_trait;
use thiserror::Error;

/// Messages API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Messages API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Error constructing the HTTP client.
#[derive(Debug, Error)]
#[error("failed to construct classifier HTTP client: {0}")]
pub struct ClassifierSetupError(#[from] reqwest::Error);

/// Duplicate classifier calling the Anthropic Messages API.
///
/// Every failure mode (absent credential, transport error, timeout,
/// non-success status, unparseable body) degrades into a
/// [`ClassifierResponse`] variant; the call itself never fails.
#[derive(Debug, Clone)]
pub struct AnthropicClassifier {
    http: reqwest::Client,
    config: ClassifierConfig,
}

impl AnthropicClassifier {
    /// Creates a classifier with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierSetupError`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierSetupError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    /// Creates a classifier from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierSetupError`] when the HTTP client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self, ClassifierSetupError> {
        Self::new(ClassifierConfig::from_env())
    }

    async fn request_verdict_text(&self, api_key: &str, prompt: String) -> Option<String> {
        let body = MessagesRequest {
            model: self.config.model().to_owned(),
            max_tokens: self.config.max_tokens(),
            temperature: 0.0,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let outcome = self
            .http
            .post(API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "classifier request failed; degrading to non-duplicate");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(
                status = %response.status(),
                "classifier returned an error status; degrading to non-duplicate"
            );
            return None;
        }

        match response.json::<MessagesResponse>().await {
            Ok(envelope) => envelope.first_text().map(ToOwned::to_owned),
            Err(error) => {
                tracing::warn!(%error, "classifier response envelope did not parse");
                None
            }
        }
    }
}

#[async_trait]
impl DuplicateClassifier for AnthropicClassifier {
    async fn classify(
        &self,
        existing: &[TaskSummary],
        incoming: &[ImportCandidate],
    ) -> ClassifierResponse {
        let Some(api_key) = self.config.api_key().map(ToOwned::to_owned) else {
            tracing::debug!("no classifier credential configured; skipping duplicate analysis");
            return ClassifierResponse::Unavailable;
        };

        let prompt = match render_prompt(existing, incoming) {
            Ok(prompt) => prompt,
            Err(error) => {
                tracing::warn!(%error, "prompt rendering failed; degrading to non-duplicate");
                return ClassifierResponse::Unavailable;
            }
        };

        let Some(text) = self.request_verdict_text(&api_key, prompt).await else {
            return ClassifierResponse::Unavailable;
        };

        parse_verdicts(&text).map_or_else(
            || {
                tracing::warn!("classifier answer was not a verdict array");
                ClassifierResponse::Malformed
            },
            ClassifierResponse::Verdicts,
        )
    }
}
