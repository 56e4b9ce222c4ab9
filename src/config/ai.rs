//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIConfig;
use crate::adapters::reasoning::LlmReasonerConfig;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model for extraction, reflection, and generated messages
    #[serde(default = "default_model")]
    pub model: String,

    /// Model for the relatedness and relevance checks
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Temperature for structured calls
    #[serde(default)]
    pub temperature: f32,

    /// Temperature for clarification and redirect messages
    #[serde(default = "default_clarification_temperature")]
    pub clarification_temperature: f32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Provider settings, or `None` when no key is configured.
    pub fn openai(&self) -> Option<OpenAIConfig> {
        let key = self.openai_api_key.clone().filter(|_| self.has_openai())?;
        Some(
            OpenAIConfig::from_secret(key)
                .with_base_url(&self.base_url)
                .with_model(&self.model)
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    pub fn reasoner(&self) -> LlmReasonerConfig {
        LlmReasonerConfig {
            classifier_model: Some(self.classifier_model.clone()),
            temperature: self.temperature,
            clarification_temperature: self.clarification_temperature,
            ..Default::default()
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        for temperature in [self.temperature, self.clarification_temperature] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ValidationError::InvalidTemperature(temperature));
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            classifier_model: default_classifier_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            temperature: 0.0,
            clarification_temperature: default_clarification_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_classifier_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

fn default_clarification_temperature() -> f32 {
    0.5
}
