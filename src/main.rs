use anyhow::Result;
use clap::Parser;
use cinelist::app::{run_command, AppState};
use cinelist::cli::Cli;
use cinelist::config::Config;
use dotenvy::dotenv;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = dotenv();
    init_tracing();
    match loaded {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) => debug!("No .env file loaded ({}) - relying on environment", e),
    }

    let cli = Cli::parse();
    let config = Config::from_env();
    let state = AppState::from_config(&config, &cli)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&state, cli.command, &mut out, cli.json).await
}
