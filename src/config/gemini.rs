//! Gemini provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    /// API key, kept server-side only
    pub api_key: Option<Secret<String>>,

    /// Model name used in the generateContent path
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without trailing `/models`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; unset means the HTTP client default
    pub timeout_secs: Option<u64>,
}

impl GeminiSettings {
    /// Check if a non-empty API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Get timeout as Duration, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build the provider config, or `None` when no key is configured
    pub fn provider_config(&self) -> Option<GeminiConfig> {
        let key = self.api_key.as_ref().filter(|_| self.has_api_key())?;

        let mut config = GeminiConfig::from_secret(key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone());
        if let Some(timeout) = self.timeout() {
            config = config.with_timeout(timeout);
        }
        Some(config)
    }

    /// Validate Gemini configuration
    pub fn validate(&self, require_key: bool) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GEMINI__MODEL"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        if require_key && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        Ok(())
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
