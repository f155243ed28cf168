//! The `codemate` command line.

use crate::approval::{AutoApprove, PromptApprover, RejectAll};
use crate::console::ConsoleSink;
use crate::history::SessionStore;
use crate::inference::{ClientManager, OpenAIConfig};
use crate::infrastructure::config::Settings;
use anyhow::{Context, Result};
use clap::Parser;
use codemate_sdk::{
    AgentConfig, AgentLoopBuilder, ApprovalSink, EditState, Role, StopReason, review_edits,
};
use reqwest::Url;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "codemate",
    version,
    about = "Codemate - an AI coding agent confined to your project folder"
)]
pub struct Cli {
    /// Project folder (default: the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Model to use (overrides configuration)
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum rounds of tool calls
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Apply proposed edits without asking
    #[arg(long)]
    pub auto_apply: bool,

    /// Continue an existing history session
    #[arg(long)]
    pub session: Option<String>,

    /// Path to a config file (default: ./codemate.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show the model's reasoning while it streams
    #[arg(long)]
    pub show_thinking: bool,

    /// Do not record the exchange in the history
    #[arg(long)]
    pub no_history: bool,

    /// The request
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

impl Cli {
    /// The request as one string.
    #[must_use]
    pub fn message(&self) -> String {
        self.message.join(" ")
    }

    /// Applies command line overrides on top of the configured agent settings.
    pub fn apply_overrides(&self, config: &mut AgentConfig) {
        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if self.auto_apply {
            config.auto_apply = true;
        }
    }
}

/// Builds the client configuration from settings.
///
/// # Errors
///
/// Returns an error if no API key is set or the base URL is invalid.
pub fn client_config(settings: &Settings) -> Result<OpenAIConfig> {
    let api_key = settings.inference.api_key.clone().context(
        "No API key configured. Set CODEMATE__INFERENCE__API_KEY or inference.api_key in codemate.toml",
    )?;

    let mut base_url = settings.inference.base_url.clone();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    let base_url = Url::parse(&base_url)
        .with_context(|| format!("Invalid inference base URL '{base_url}'"))?;

    let mut config = OpenAIConfig::new(api_key, base_url);
    if let Some(max_retries) = settings.inference.max_retries {
        config = config.with_max_retries(max_retries);
    }
    Ok(config)
}

/// Runs one request end to end.
///
/// # Errors
///
/// Returns an error for invalid configuration, an unknown session, history
/// I/O failures, or a failed completion request.
pub async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let message = cli.message();
    let mut agent_config = settings.agent.clone();
    cli.apply_overrides(&mut agent_config);

    let manager = Arc::new(ClientManager::new());
    manager.initialize(client_config(&settings)?);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    let root = std::fs::canonicalize(&root)
        .with_context(|| format!("Project folder {} does not exist", root.display()))?;

    let agent = AgentLoopBuilder::new()
        .source(manager.clone())
        .root(root)
        .config(agent_config.clone())
        .build()?;

    let history = if cli.no_history {
        None
    } else {
        let store = SessionStore::open(settings.history.resolved_directory())?;
        let session = match &cli.session {
            Some(id) => store
                .get_session(id)?
                .with_context(|| format!("Session {id} not found"))?,
            None => store.create_session(message.lines().next())?,
        };
        store.append_message(&session.id, Role::User, message.clone())?;
        Some((store, session.id))
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut sink = ConsoleSink::new(std::io::stdout(), cli.show_thinking);
    let outcome = agent.run(&message, &mut sink, &cancel).await?;

    match outcome.stop_reason {
        StopReason::Completed => {}
        StopReason::BudgetExhausted => {
            warn!(iterations = outcome.iterations, "Stopped at the iteration limit");
        }
        StopReason::Cancelled => eprintln!("Cancelled."),
    }

    let mut edits = outcome.proposed_edits;
    if !edits.is_empty() && outcome.stop_reason != StopReason::Cancelled {
        let mut approver: Box<dyn ApprovalSink> = if agent_config.auto_apply {
            Box::new(AutoApprove)
        } else if std::io::stdin().is_terminal() {
            Box::new(PromptApprover::new(
                std::io::stdin().lock(),
                std::io::stderr(),
            ))
        } else {
            warn!("Standard input is not a terminal; rejecting proposed edits");
            Box::new(RejectAll)
        };

        let failures = review_edits(agent.executor().files(), &mut edits, approver.as_mut());
        for edit in &edits {
            match edit.state {
                EditState::Applied => eprintln!("Applied edit to {}", edit.path),
                EditState::Rejected => eprintln!("Discarded edit to {}", edit.path),
                EditState::Proposed => {}
            }
        }
        for (path, error) in failures {
            eprintln!("Could not apply edit to {path}: {error}");
        }
    }

    if let Some((store, session_id)) = history {
        if !outcome.final_response.is_empty() {
            store.append_message(&session_id, Role::Assistant, outcome.final_response)?;
        }
        info!(session_id = %session_id, "Exchange recorded");
    }

    Ok(())
}
