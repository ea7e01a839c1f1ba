use clap::Parser;
use tracing_subscriber::EnvFilter;

use agenda::cli::Cli;
use agenda::commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    commands::show_schedule(&cli.credentials, &cli.token).await
}
