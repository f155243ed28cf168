//! The `codemate` command line binary.

use anyhow::Context;
use clap::Parser;
use codemate_kernel::cli::{self, Cli};
use codemate_kernel::infrastructure::{config::Settings, telemetry::TelemetryBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    TelemetryBuilder::new("codemate", env!("CARGO_PKG_VERSION"))
        .with_log_level(settings.telemetry.log_level.clone())
        .with_json(settings.telemetry.json)
        .init()?;

    cli::run(cli, settings).await
}
