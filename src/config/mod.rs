//! # Configuration
//!
//! Layered configuration for the decision-graph engine:
//!
//! 1. built-in defaults ([`SidequestConfig::default`])
//! 2. `config/sidequest.toml` (optional)
//! 3. `config/sidequest.{environment}.toml` (optional)
//! 4. `SIDEQUEST__SECTION__KEY` environment variables
//!
//! See [`ConfigManager`] for loading and environment detection.

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::client::RetryPolicy;
use crate::layout::LayoutConfig;
use crate::models::{GenerationSettings, PathStyle, Timeline, Tone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "openrouter/aurora-alpha";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidequestConfig {
    pub model: ModelConfig,
    pub retry: RetryConfig,
    pub layout: LayoutConfig,
    pub generation: GenerationDefaults,
}

/// Text-generation provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub request_timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2000,
            backoff_multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::from(self)
    }
}

/// Generation settings applied when a session starts without explicit ones.
///
/// Kept separate from [`GenerationSettings`] so file and environment keys stay snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationDefaults {
    pub tone: Tone,
    pub timeline: Timeline,
    pub path_style: PathStyle,
    pub depth: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        GenerationSettings::default().into()
    }
}

impl From<GenerationSettings> for GenerationDefaults {
    fn from(settings: GenerationSettings) -> Self {
        Self {
            tone: settings.tone,
            timeline: settings.timeline,
            path_style: settings.path_style,
            depth: settings.depth,
        }
    }
}

impl From<GenerationDefaults> for GenerationSettings {
    fn from(defaults: GenerationDefaults) -> Self {
        Self {
            tone: defaults.tone,
            timeline: defaults.timeline,
            path_style: defaults.path_style,
            depth: defaults.depth,
        }
    }
}

impl SidequestConfig {
    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.endpoint.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "model.endpoint",
                &self.model.endpoint,
                "endpoint must not be empty",
            ));
        }
        if self.model.model.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "model.model",
                &self.model.model,
                "model name must not be empty",
            ));
        }
        if self.model.request_timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "model.request_timeout_seconds",
                0,
                "timeout must be positive",
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigurationError::invalid_value(
                "retry.max_attempts",
                0,
                "at least one attempt is required",
            ));
        }
        if self.retry.backoff_multiplier.is_nan() || self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigurationError::invalid_value(
                "retry.backoff_multiplier",
                self.retry.backoff_multiplier,
                "multiplier must be at least 1.0",
            ));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(ConfigurationError::validation_error(format!(
                "retry.max_delay_ms ({}) is below retry.base_delay_ms ({})",
                self.retry.max_delay_ms, self.retry.base_delay_ms
            )));
        }

        let footprint = [
            ("layout.node_width", self.layout.node_width),
            ("layout.node_height", self.layout.node_height),
        ];
        for (field, value) in footprint {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value,
                    "node footprint must be positive",
                ));
            }
        }
        let spacing = [
            ("layout.node_separation", self.layout.node_separation),
            ("layout.rank_separation", self.layout.rank_separation),
        ];
        for (field, value) in spacing {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value,
                    "separation must not be negative",
                ));
            }
        }

        if !GenerationSettings::depth_in_range(self.generation.depth) {
            return Err(ConfigurationError::invalid_value(
                "generation.depth",
                self.generation.depth,
                format!(
                    "depth must be between {} and {}",
                    GenerationSettings::MIN_DEPTH,
                    GenerationSettings::MAX_DEPTH
                ),
            ));
        }

        Ok(())
    }

    pub fn default_settings(&self) -> GenerationSettings {
        self.generation.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SidequestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_settings(), GenerationSettings::default());
        assert_eq!(config.retry.policy(), RetryPolicy::default());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = SidequestConfig::default();
        config.retry.max_attempts = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { ref field, .. }) if field == "retry.max_attempts"
        ));

        let mut config = SidequestConfig::default();
        config.layout.node_width = 0.0;
        assert!(config.validate().is_err());

        let mut config = SidequestConfig::default();
        config.generation.depth = 1;
        assert!(config.validate().is_err());

        let mut config = SidequestConfig::default();
        config.generation.depth = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidValue { ref field, .. }) if field == "generation.depth"
        ));

        let mut config = SidequestConfig::default();
        config.retry.backoff_multiplier = f64::NAN;
        assert!(config.validate().is_err());
    }
}
