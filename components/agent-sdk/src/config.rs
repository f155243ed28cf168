//! Configuration management for the agent loop and file tools.
//!
//! Provides a strongly-typed configuration with environment variable
//! support and sensible defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Agent configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Maximum number of tool-calling turns before the loop is finalized.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Model identifier passed to the completion service.
    #[serde(default = "default_model")]
    pub model: String,

    /// Largest file `read_file` will return, in bytes.
    #[serde(default = "default_max_file_read_size")]
    pub max_file_read_size: u64,

    /// Glob patterns the path validator rejects.
    #[serde(default = "default_blocked_patterns")]
    pub blocked_patterns: Vec<String>,

    /// Maximum number of entries returned by `list_files`.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Maximum number of files scanned by `search_files`.
    #[serde(default = "default_search_file_limit")]
    pub search_file_limit: usize,

    /// Number of matches after which `search_files` stops scanning.
    #[serde(default = "default_search_match_limit")]
    pub search_match_limit: usize,

    /// Maximum characters kept from a matching line.
    #[serde(default = "default_search_line_max_chars")]
    pub search_line_max_chars: usize,

    /// Extra host instructions appended to the system prompt.
    #[serde(default)]
    pub instructions: Option<String>,

    /// Apply proposed edits without asking.
    #[serde(default)]
    pub auto_apply: bool,
}

impl AgentConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables are prefixed with `CODEMATE_AGENT_`.
    /// For example: `CODEMATE_AGENT_MAX_ITERATIONS=15`.
    /// `CODEMATE_AGENT_BLOCKED_PATTERNS` is a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(val) = lookup("CODEMATE_AGENT_MAX_ITERATIONS") {
            config.max_iterations = parse_value("max_iterations", val)?;
        }

        if let Some(val) = lookup("CODEMATE_AGENT_MODEL") {
            config.model = val;
        }

        if let Some(val) = lookup("CODEMATE_AGENT_MAX_FILE_READ_SIZE") {
            config.max_file_read_size = parse_value("max_file_read_size", val)?;
        }

        if let Some(val) = lookup("CODEMATE_AGENT_BLOCKED_PATTERNS") {
            config.blocked_patterns = val
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(val) = lookup("CODEMATE_AGENT_INSTRUCTIONS") {
            config.instructions = Some(val);
        }

        if let Some(val) = lookup("CODEMATE_AGENT_AUTO_APPLY") {
            config.auto_apply = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is zero or the model name is empty.
    pub fn validate(&self) -> Result<&Self, ConfigError> {
        let zero_checks = [
            ("max_iterations", u64::from(self.max_iterations)),
            ("max_file_read_size", self.max_file_read_size),
            ("list_limit", self.list_limit as u64),
            ("search_file_limit", self.search_file_limit as u64),
            ("search_match_limit", self.search_match_limit as u64),
            ("search_line_max_chars", self.search_line_max_chars as u64),
        ];
        for (key, value) in zero_checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: "0".to_string(),
                });
            }
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model".to_string(),
                value: "empty".to_string(),
            });
        }

        Ok(self)
    }

    /// Returns a builder for creating configuration.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, val: String) -> Result<T, ConfigError> {
    val.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: val,
    })
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            model: default_model(),
            max_file_read_size: default_max_file_read_size(),
            blocked_patterns: default_blocked_patterns(),
            list_limit: default_list_limit(),
            search_file_limit: default_search_file_limit(),
            search_match_limit: default_search_match_limit(),
            search_line_max_chars: default_search_line_max_chars(),
            instructions: None,
            auto_apply: false,
        }
    }
}

/// Builder for constructing `AgentConfig`.
#[derive(Debug, Default)]
pub struct AgentConfigBuilder {
    max_iterations: Option<u32>,
    model: Option<String>,
    max_file_read_size: Option<u64>,
    blocked_patterns: Option<Vec<String>>,
    list_limit: Option<usize>,
    search_file_limit: Option<usize>,
    search_match_limit: Option<usize>,
    instructions: Option<String>,
    auto_apply: Option<bool>,
}

impl AgentConfigBuilder {
    /// Sets the iteration budget.
    #[must_use]
    pub fn max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum readable file size in bytes.
    #[must_use]
    pub fn max_file_read_size(mut self, size: u64) -> Self {
        self.max_file_read_size = Some(size);
        self
    }

    /// Replaces the path blocklist.
    #[must_use]
    pub fn blocked_patterns(mut self, patterns: Vec<String>) -> Self {
        self.blocked_patterns = Some(patterns);
        self
    }

    /// Sets the `list_files` entry cap.
    #[must_use]
    pub fn list_limit(mut self, limit: usize) -> Self {
        self.list_limit = Some(limit);
        self
    }

    /// Sets the number of files `search_files` scans.
    #[must_use]
    pub fn search_file_limit(mut self, limit: usize) -> Self {
        self.search_file_limit = Some(limit);
        self
    }

    /// Sets the match count after which `search_files` stops.
    #[must_use]
    pub fn search_match_limit(mut self, limit: usize) -> Self {
        self.search_match_limit = Some(limit);
        self
    }

    /// Sets extra system instructions.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Sets whether proposed edits are applied without review.
    #[must_use]
    pub fn auto_apply(mut self, auto_apply: bool) -> Self {
        self.auto_apply = Some(auto_apply);
        self
    }

    /// Builds the configuration, validating all values.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<AgentConfig, ConfigError> {
        let mut config = AgentConfig::default();

        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if let Some(v) = self.model {
            config.model = v;
        }
        if let Some(v) = self.max_file_read_size {
            config.max_file_read_size = v;
        }
        if let Some(v) = self.blocked_patterns {
            config.blocked_patterns = v;
        }
        if let Some(v) = self.list_limit {
            config.list_limit = v;
        }
        if let Some(v) = self.search_file_limit {
            config.search_file_limit = v;
        }
        if let Some(v) = self.search_match_limit {
            config.search_match_limit = v;
        }
        if self.instructions.is_some() {
            config.instructions = self.instructions;
        }
        if let Some(v) = self.auto_apply {
            config.auto_apply = v;
        }

        config.validate()?;
        Ok(config)
    }
}

// Default value functions
fn default_max_iterations() -> u32 {
    10
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_max_file_read_size() -> u64 {
    100_000
}

/// The blocklist applied when none is configured.
#[must_use]
pub fn default_blocked_patterns() -> Vec<String> {
    [
        ".env",
        ".env.*",
        "*.key",
        "*.pem",
        "*.p12",
        "credentials.*",
        "**/node_modules/**",
        "**/.git/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_list_limit() -> usize {
    100
}

fn default_search_file_limit() -> usize {
    50
}

fn default_search_match_limit() -> usize {
    50
}

fn default_search_line_max_chars() -> usize {
    200
}
