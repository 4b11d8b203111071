//! services/taskflow/src/bin/taskflow.rs
//!
//! Command-line front end. Every command prints JSON on stdout; logs go to stderr.

use clap::Parser;
use taskflow_lib::{
    cli::{run, Cli},
    config::Config,
    error::AppError,
    state::AppState,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Wire the stores ---
    let state = AppState::from_config(&config)?;

    // --- 3. Run the command ---
    let output = run(&state, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
