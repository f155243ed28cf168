//! Lifecycle of the shared completion client.
//!
//! The host owns one [`ClientManager`]; every agent loop holds it as its
//! [`CompletionSource`]. Reinitializing swaps the client for requests that
//! start afterwards while streams already open keep their old client.

use crate::inference::openai::{OpenAIConfig, OpenAIStreamingClient};
use async_trait::async_trait;
use codemate_sdk::{CompletionRequest, CompletionSource, CompletionStream, InferenceError};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Owns at most one streaming client.
#[derive(Debug, Default)]
pub struct ClientManager {
    client: RwLock<Option<Arc<OpenAIStreamingClient>>>,
}

impl ClientManager {
    /// Creates a manager with no client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the client if none exists yet.
    ///
    /// Returns `false` when a client was already initialized; use
    /// [`reinitialize`](Self::reinitialize) to replace it.
    pub fn initialize(&self, config: OpenAIConfig) -> bool {
        let mut client = self.client.write();
        if client.is_some() {
            debug!("Completion client already initialized");
            return false;
        }
        *client = Some(Arc::new(OpenAIStreamingClient::new(config)));
        info!("Completion client initialized");
        true
    }

    /// Replaces the client, e.g. after the API key changed.
    pub fn reinitialize(&self, config: OpenAIConfig) {
        *self.client.write() = Some(Arc::new(OpenAIStreamingClient::new(config)));
        info!("Completion client reinitialized");
    }

    /// Drops the client.
    pub fn destroy(&self) {
        if self.client.write().take().is_some() {
            info!("Completion client destroyed");
        }
    }

    /// Whether a client is available.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.read().is_some()
    }

    /// The current client.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::NotInitialized`] when no client exists.
    pub fn client(&self) -> Result<Arc<OpenAIStreamingClient>, InferenceError> {
        self.client
            .read()
            .clone()
            .ok_or(InferenceError::NotInitialized)
    }
}

#[async_trait]
impl CompletionSource for ClientManager {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, InferenceError> {
        let client = self.client()?;
        client.stream_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use secrecy::SecretString;

    fn config(retries: u32) -> OpenAIConfig {
        OpenAIConfig::new(
            SecretString::new("key".into()),
            Url::parse("https://api.openai.com/v1/").unwrap(),
        )
        .with_max_retries(retries)
    }

    #[test]
    fn test_client_requires_initialization() {
        let manager = ClientManager::new();
        assert!(!manager.is_initialized());
        assert_eq!(manager.client().unwrap_err(), InferenceError::NotInitialized);
    }

    #[test]
    fn test_initialize_is_idempotent_and_reinitialize_replaces() {
        let manager = ClientManager::new();
        assert!(manager.initialize(config(1)));
        assert!(!manager.initialize(config(2)));
        assert_eq!(manager.client().unwrap().retry_config().max_retries, 1);

        manager.reinitialize(config(5));
        assert_eq!(manager.client().unwrap().retry_config().max_retries, 5);
    }

    #[test]
    fn test_destroy_clears_client() {
        let manager = ClientManager::new();
        manager.initialize(config(0));
        manager.destroy();
        assert!(!manager.is_initialized());
        manager.destroy();
    }

    #[tokio::test]
    async fn test_uninitialized_manager_fails_requests() {
        let manager = ClientManager::new();
        let result = manager
            .stream_completion(CompletionRequest {
                model: "m".to_string(),
                system_instructions: String::new(),
                messages: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(InferenceError::NotInitialized)));
    }
}
