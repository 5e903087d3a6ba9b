//! Command-line interface.
//!
//! A thin caller over the estimation engine: it builds calculator state from
//! flags, prints the result, and hands snapshots to the JSON history store.

mod config;
mod estimate;
mod history;

use clap::{Parser, Subcommand};

pub use config::{ConfigCommand, run_config_command};
pub use estimate::{EstimateArgs, FeaturesArgs, run_estimate_command, run_features_command};
pub use history::{HistoryCommand, run_history_command};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "appquote", version, about = "Price app projects from a feature catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the feature catalog
    Features(FeaturesArgs),

    /// Price a feature selection
    Estimate(EstimateArgs),

    /// Work with saved estimates
    #[command(subcommand)]
    History(HistoryCommand),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Dispatch the parsed command.
    pub fn run(self, config: &AppConfig) -> anyhow::Result<()> {
        match self.command {
            Command::Features(args) => run_features_command(args, config),
            Command::Estimate(args) => run_estimate_command(args, config),
            Command::History(cmd) => run_history_command(cmd, config),
            Command::Config(cmd) => run_config_command(cmd, config),
        }
    }
}
