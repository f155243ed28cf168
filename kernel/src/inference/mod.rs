//! Completion services used by the agent loop.

pub mod manager;
pub mod openai;

pub use manager::ClientManager;
pub use openai::{OpenAIConfig, OpenAIStreamingClient, RetryConfig};
