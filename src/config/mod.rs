//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHECKVISION` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use checkvision::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gemini key configured: {}", config.gemini.has_api_key());
//! ```

mod error;
mod gemini;
mod server;

pub use error::{ConfigError, ValidationError};
pub use gemini::GeminiSettings;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Plain variable name accepted for the API key, matching common Gemini tooling.
pub const PLAIN_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gemini API configuration (key, model, endpoint)
    #[serde(default)]
    pub gemini: GeminiSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds `gemini.api_key` from plain `GEMINI_API_KEY` when set
    /// 3. Reads environment variables with `CHECKVISION` prefix
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `CHECKVISION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CHECKVISION__GEMINI__API_KEY=...` -> `gemini.api_key = ...`
    ///
    /// The prefixed key wins over the plain one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Ok(key) = std::env::var(PLAIN_API_KEY_VAR) {
            builder = builder.set_default("gemini.api_key", key)?;
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("CHECKVISION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// A missing API key is only an error in production; elsewhere the
    /// server starts and reports the problem per request.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gemini.validate(self.is_production())?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
