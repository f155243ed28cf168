//! Codemate Kernel - host runtime for the Codemate agent.
//!
//! This crate wires the SDK's agent loop to the outside world: a streaming
//! `OpenAI`-compatible completion client, layered settings, logging, chat
//! history, approval prompts and the `codemate` command line.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Approval sinks for proposed edits.
pub mod approval;
/// Command line interface.
pub mod cli;
/// Terminal rendering of agent progress.
pub mod console;
/// Persistent chat history.
pub mod history;
/// Streaming completion clients.
pub mod inference;
/// Infrastructure components (config, telemetry).
pub mod infrastructure;
