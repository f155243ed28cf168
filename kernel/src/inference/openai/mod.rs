//! `OpenAI`-compatible streaming provider.

pub mod client;
pub mod mapping;
pub mod streaming;

pub use client::{OpenAIConfig, OpenAIStreamingClient};
pub use streaming::{RetryConfig, SseDecoder, SseFrame};
