//! Layered settings for the Codemate host.
//!
//! Values come from built-in defaults, an optional `codemate.toml`, and
//! `CODEMATE__*` environment variables, in increasing priority. Nested keys
//! use `__` as separator, e.g. `CODEMATE__AGENT__MAX_ITERATIONS=20`.

use codemate_sdk::AgentConfig;
use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Top-level configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Completion service settings.
    pub inference: InferenceSettings,
    /// Agent loop settings.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Logging settings.
    pub telemetry: TelemetrySettings,
    /// Session history settings.
    #[serde(default)]
    pub history: HistorySettings,
}

/// Completion service settings.
#[derive(Debug, Deserialize, Clone)]
pub struct InferenceSettings {
    /// API key; requests fail until one is set.
    pub api_key: Option<SecretString>,
    /// Base URL of the `OpenAI`-compatible API.
    pub base_url: String,
    /// Overrides `agent.model` when set.
    pub model: Option<String>,
    /// Connection retries for transient failures.
    pub max_retries: Option<u32>,
}

/// Logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Session history settings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HistorySettings {
    /// Where sessions are stored; defaults to the platform data directory.
    pub directory: Option<PathBuf>,
}

impl HistorySettings {
    /// The directory to store sessions in.
    #[must_use]
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("codemate")
                .join("sessions")
        })
    }
}

impl Settings {
    /// Loads settings from `codemate.toml` in the working directory, if
    /// present, and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built or deserialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Loads settings, reading `file` instead of `codemate.toml` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `file` does not exist, or the configuration cannot
    /// be built or deserialized.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("codemate").required(false),
        };

        let s = Config::builder()
            .set_default("inference.base_url", DEFAULT_BASE_URL)?
            .set_default("telemetry.log_level", "info")?
            .set_default("telemetry.json", false)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("CODEMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("agent.blocked_patterns"),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;
        if let Some(model) = settings.inference.model.clone() {
            settings.agent.model = model;
        }
        Ok(settings)
    }
}
