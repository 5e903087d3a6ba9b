use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use appquote::cli::Cli;
use appquote::config::{AppConfig, LOG_FORMAT_VAR};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Logs go to stderr so command output stays pipeable.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("appquote=info"));
    let json = std::env::var(LOG_FORMAT_VAR).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Resolved configuration");

    cli.run(&config)
}
