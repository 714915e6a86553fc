//! Configuration Loader
//!
//! Environment-aware loading built on the `config` crate. Handles environment
//! detection, optional per-environment TOML files and `SIDEQUEST__*` overrides.

use super::error::{ConfigResult, ConfigurationError};
use super::SidequestConfig;
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const BASE_FILE_NAME: &str = "sidequest";
const ENV_PREFIX: &str = "SIDEQUEST";
const ENV_SEPARATOR: &str = "__";

pub struct ConfigManager {
    config: SidequestConfig,
    environment: String,
    config_directory: PathBuf,
    loaded_files: Vec<PathBuf>,
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("environment", &self.environment)
            .field("config_directory", &self.config_directory)
            .field("loaded_files", &self.loaded_files)
            .finish()
    }
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Useful in tests, where mutating process environment is racy.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading configuration"
        );

        let (config, loaded_files) = Self::load_and_merge_config(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = %environment,
            files = loaded_files.len(),
            model = %config.model.model,
            "Configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
            loaded_files,
        }))
    }

    /// Wrap an already-built configuration, validating it first
    pub fn from_config(config: SidequestConfig, environment: &str) -> ConfigResult<ConfigManager> {
        config.validate()?;
        Ok(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from("config"),
            loaded_files: Vec::new(),
        })
    }

    pub fn config(&self) -> &SidequestConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Files that contributed to the configuration, in merge order
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    /// Configuration as JSON with sensitive values masked, safe to log
    pub fn debug_config(&self) -> serde_json::Value {
        let mut config_json = serde_json::json!(self.config);
        Self::sanitize_json_recursive(&mut config_json, &["password", "secret", "token", "credential"]);

        let key_present = env::var(&self.config.model.api_key_env)
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);
        if let Some(model) = config_json.get_mut("model").and_then(|m| m.as_object_mut()) {
            model.insert("api_key_present".to_string(), serde_json::json!(key_present));
        }

        serde_json::json!({
            "environment": self.environment,
            "config_directory": self.config_directory.display().to_string(),
            "loaded_files": self
                .loaded_files
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
            "config": config_json,
        })
    }

    fn sanitize_json_recursive(value: &mut serde_json::Value, sensitive_patterns: &[&str]) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    let is_sensitive = sensitive_patterns
                        .iter()
                        .any(|pattern| key_lower.contains(pattern));

                    if is_sensitive {
                        let empty = matches!(val, serde_json::Value::String(s) if s.is_empty());
                        let marker = if empty { "[EMPTY]" } else { "[MASKED]" };
                        *val = serde_json::Value::String(marker.to_string());
                    } else {
                        Self::sanitize_json_recursive(val, sensitive_patterns);
                    }
                }
            }
            serde_json::Value::Array(items) => {
                for item in items.iter_mut() {
                    Self::sanitize_json_recursive(item, sensitive_patterns);
                }
            }
            _ => {}
        }
    }

    /// Detect the environment from `SIDEQUEST_ENV`, then `APP_ENV`, else `development`
    pub fn detect_environment() -> String {
        env::var("SIDEQUEST_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn read_config_file(path: &Path) -> ConfigResult<String> {
        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }

    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
    ) -> ConfigResult<(SidequestConfig, Vec<PathBuf>)> {
        let defaults = Config::try_from(&SidequestConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);
        let mut loaded_files = Vec::new();

        let candidates = [
            config_directory.join(format!("{BASE_FILE_NAME}.toml")),
            config_directory.join(format!("{BASE_FILE_NAME}.{environment}.toml")),
        ];
        for path in candidates {
            if !path.is_file() {
                debug!(path = %path.display(), "Optional configuration file not present");
                continue;
            }
            let contents = Self::read_config_file(&path)?;
            builder = builder.add_source(File::from_str(&contents, FileFormat::Toml));
            debug!(path = %path.display(), "Merged configuration file");
            loaded_files.push(path);
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder.build()?.try_deserialize::<SidequestConfig>()?;
        Ok((config, loaded_files))
    }
}
