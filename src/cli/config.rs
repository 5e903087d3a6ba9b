//! Configuration CLI commands.
//!
//! Commands for viewing the resolved configuration.

use clap::Subcommand;

use crate::config::{AppConfig, CURRENCY_VAR, HISTORY_PATH_VAR, TIER_VAR};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// List all settings, their values, and the variables that set them
    List,

    /// Get a specific setting value
    Get {
        /// Setting name ("history_path", "currency", or "tier")
        name: String,
    },
}

/// Run a config command.
pub fn run_config_command(cmd: ConfigCommand, config: &AppConfig) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::List => {
            list_settings(config);
            Ok(())
        }
        ConfigCommand::Get { name } => get_setting(config, &name),
    }
}

fn settings(config: &AppConfig) -> Vec<(&'static str, &'static str, String)> {
    vec![
        (
            "history_path",
            HISTORY_PATH_VAR,
            config.history_path.display().to_string(),
        ),
        ("currency", CURRENCY_VAR, config.currency.to_string()),
        ("tier", TIER_VAR, config.complexity.to_string()),
    ]
}

fn list_settings(config: &AppConfig) {
    let all = settings(config);
    let max_key_len = all.iter().map(|(k, _, _)| k.len()).max().unwrap_or(0);

    println!("Settings:");
    println!();
    for (key, var, value) in all {
        println!("  {:width$}  {}  ({})", key, value, var, width = max_key_len);
    }
}

fn get_setting(config: &AppConfig, name: &str) -> anyhow::Result<()> {
    match settings(config).into_iter().find(|(k, _, _)| *k == name) {
        Some((_, _, value)) => {
            println!("{}", value);
            Ok(())
        }
        None => anyhow::bail!("Setting not found: {}", name),
    }
}
