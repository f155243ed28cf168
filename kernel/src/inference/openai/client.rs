//! `OpenAI`-compatible streaming HTTP client.

use crate::inference::openai::mapping::{OpenAIChatRequest, create_request, map_chunk};
use crate::inference::openai::streaming::{RetryConfig, SseDecoder, SseFrame};
use async_trait::async_trait;
use bytes::Bytes;
use codemate_sdk::{
    CompletionRequest, CompletionSource, CompletionStream, InferenceError, StreamEvent,
};
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Configuration for the streaming client
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// The API key sent as a bearer token
    pub api_key: SecretString,
    /// Base URL of the API, ending in `/`
    pub base_url: Url,
    /// Maximum number of retries while connecting
    pub max_retries: Option<u32>,
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: Option<u64>,
}

impl OpenAIConfig {
    /// Creates a new config with default retry settings
    #[must_use]
    pub fn new(api_key: SecretString, base_url: Url) -> Self {
        Self {
            api_key,
            base_url,
            max_retries: None,
            base_delay_ms: None,
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the base delay for exponential backoff
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = Some(delay_ms);
        self
    }
}

/// Streams chat completions from an `OpenAI`-compatible endpoint.
#[derive(Debug)]
pub struct OpenAIStreamingClient {
    client: Client,
    config: OpenAIConfig,
    retry_config: RetryConfig,
}

impl OpenAIStreamingClient {
    /// Creates a new client with the given configuration.
    #[must_use]
    pub fn new(config: OpenAIConfig) -> Self {
        let mut retry_config = RetryConfig::new();
        if let Some(max_retries) = config.max_retries {
            retry_config = retry_config.with_max_retries(max_retries);
        }
        if let Some(delay_ms) = config.base_delay_ms {
            retry_config = retry_config.with_base_delay_ms(delay_ms);
        }

        Self {
            client: Client::new(),
            config,
            retry_config,
        }
    }

    /// The retry policy in use.
    #[must_use]
    pub fn retry_config(&self) -> RetryConfig {
        self.retry_config
    }

    /// Makes a single connection attempt.
    async fn connect(
        &self,
        provider_req: &OpenAIChatRequest,
    ) -> Result<reqwest::Response, InferenceError> {
        let res = self
            .build_api_request(provider_req)?
            .send()
            .await
            .map_err(|e| InferenceError::NetworkError(e.to_string()))?;

        Self::check_status(res).await
    }

    fn build_api_request(
        &self,
        provider_req: &OpenAIChatRequest,
    ) -> Result<reqwest::RequestBuilder, InferenceError> {
        let url = self
            .config
            .base_url
            .join("chat/completions")
            .map_err(|e| InferenceError::ConfigError(format!("Invalid URL join: {e}")))?;

        Ok(self
            .client
            .post(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(provider_req))
    }

    async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, InferenceError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(InferenceError::RateLimit),
            _ => {
                let text = res.text().await.unwrap_or_default();
                if status == StatusCode::BAD_REQUEST && text.contains("context_length_exceeded") {
                    Err(InferenceError::ContextLengthExceeded)
                } else {
                    Err(InferenceError::ProviderError(format!("HTTP {status}: {text}")))
                }
            }
        }
    }
}

#[async_trait]
impl CompletionSource for OpenAIStreamingClient {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, InferenceError> {
        let provider_req = create_request(request);
        let mut last_error = InferenceError::NetworkError("No attempts made".to_string());

        for attempt in 0..=self.retry_config.max_retries {
            match self.connect(&provider_req).await {
                Ok(response) => {
                    debug!(model = %provider_req.model, "Completion stream opened");
                    return Ok(event_stream(response.bytes_stream().boxed()));
                }
                Err(error) => {
                    last_error = error;

                    if !last_error.is_retryable() || attempt >= self.retry_config.max_retries {
                        break;
                    }

                    let delay = self.retry_config.calculate_backoff_delay(attempt);
                    let delay_ms: u64 = delay.as_millis().try_into().unwrap_or(u64::MAX);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.retry_config.max_retries,
                        delay_ms = delay_ms,
                        error = %last_error,
                        "Completion request failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error)
    }
}

struct EventStreamState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<StreamEvent>,
    finished: bool,
}

impl EventStreamState {
    /// Queues the events of `frames`; returns `false` once `[DONE]` is seen.
    fn accept(&mut self, frames: impl IntoIterator<Item = SseFrame>) -> bool {
        for frame in frames {
            match frame {
                SseFrame::Done => return false,
                SseFrame::Data(data) => self.pending.extend(map_chunk(&data)),
            }
        }
        true
    }
}

/// Turns a response body into completion events.
fn event_stream(body: BoxStream<'static, reqwest::Result<Bytes>>) -> CompletionStream {
    let state = EventStreamState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((event, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let frames = state.decoder.push(&chunk);
                    state.finished = !state.accept(frames);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state
                        .pending
                        .push_back(StreamEvent::Error(format!("Stream interrupted: {e}")));
                }
                None => {
                    state.finished = true;
                    let rest = state.decoder.finish();
                    state.accept(rest);
                }
            }
        }
    })
    .boxed()
}
