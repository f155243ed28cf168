//! Agent loop builder.

use crate::config::AgentConfig;
use crate::engine::AgentLoop;
use crate::error::{AgentError, ConfigError};
use crate::fs::FileOperations;
use crate::inference::CompletionSource;
use crate::prompt::PromptBuilder;
use crate::tools::{ToolCallParser, ToolExecutor};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for constructing agent loops.
#[derive(Default)]
pub struct AgentLoopBuilder {
    source: Option<Arc<dyn CompletionSource>>,
    root: Option<PathBuf>,
    config: Option<AgentConfig>,
}

impl std::fmt::Debug for AgentLoopBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoopBuilder")
            .field("source", &self.source.is_some())
            .field("root", &self.root)
            .field("config", &self.config)
            .finish()
    }
}

impl AgentLoopBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the completion source.
    #[must_use]
    pub fn source(mut self, source: Arc<dyn CompletionSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the project folder. Without one every file tool fails.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the agent loop.
    ///
    /// # Errors
    ///
    /// Returns an error if no completion source is set, the configuration is
    /// invalid, or a blocked pattern does not compile.
    pub fn build(self) -> Result<AgentLoop, AgentError> {
        let source = self.source.ok_or_else(|| ConfigError::InvalidValue {
            key: "source".to_string(),
            value: "a completion source is required".to_string(),
        })?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let files = FileOperations::new(self.root, &config)?;
        let system_instructions = PromptBuilder::build_system_prompt(&config);

        Ok(AgentLoop {
            source,
            executor: Arc::new(ToolExecutor::new(files)),
            parser: ToolCallParser::new(),
            config,
            system_instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;
    use crate::inference::{CompletionRequest, CompletionStream};
    use async_trait::async_trait;

    struct Silent;

    #[async_trait]
    impl CompletionSource for Silent {
        async fn stream_completion(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionStream, InferenceError> {
            Err(InferenceError::NotInitialized)
        }
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let err = AgentLoopBuilder::new().build().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AgentConfig {
            max_iterations: 0,
            ..AgentConfig::default()
        };
        let err = AgentLoopBuilder::new()
            .source(Arc::new(Silent))
            .config(config)
            .build()
            .unwrap_err();
        assert!(matches!(err, AgentError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_build_without_root_uses_defaults() {
        let agent = AgentLoopBuilder::new()
            .source(Arc::new(Silent))
            .build()
            .unwrap();
        assert_eq!(agent.config().max_iterations, 10);
        assert!(agent.executor().files().root().is_none());
        assert!(agent.system_instructions().contains("## Available Tools"));
    }
}
