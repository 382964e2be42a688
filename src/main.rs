use std::process::ExitCode;

use clap::Parser;

use project_market::cli::{self, Cli};
use project_market::state::App;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    match start(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let out = cli.output();
    let config = cli.config()?;
    tracing::debug!(api_url = %config.api_url, "Starting pm");

    let mut app = App::from_config(config).await?;
    cli::run(&mut app, cli.command, out).await
}
