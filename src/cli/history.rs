//! Saved-estimate history commands.

use clap::Subcommand;

use crate::config::AppConfig;
use crate::history::{HistoryStore, JsonFileStore, SavedEstimate, summarize};

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List saved estimates, oldest first
    List {
        /// Show only the most recent N estimates
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show per-currency totals and the most selected features
    Stats,

    /// Show the history file path
    Path,
}

/// Run a history command.
pub fn run_history_command(cmd: HistoryCommand, config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.history_path);
    match cmd {
        HistoryCommand::List { limit } => list_history(&store, limit),
        HistoryCommand::Stats => show_stats(&store),
        HistoryCommand::Path => {
            show_path(&store);
            Ok(())
        }
    }
}

fn list_history(store: &dyn HistoryStore, limit: Option<usize>) -> anyhow::Result<()> {
    let history = store.load()?;
    if history.is_empty() {
        println!("No saved estimates.");
        return Ok(());
    }

    for record in recent(&history, limit) {
        println!("{}", format_record(record));
    }
    Ok(())
}

/// The last `limit` records, oldest first. `None` keeps them all.
fn recent(history: &[SavedEstimate], limit: Option<usize>) -> &[SavedEstimate] {
    let skip = limit.map_or(0, |n| history.len().saturating_sub(n));
    &history[skip..]
}

fn format_record(record: &SavedEstimate) -> String {
    let features: Vec<&str> = record.enabled_features().map(|f| f.key.as_str()).collect();
    let features = if features.is_empty() {
        "no features".to_string()
    } else {
        features.join(", ")
    };

    format!(
        "{}  {}  {:>12}  {} tier, {} screen(s): {}",
        record.saved_at.format("%Y-%m-%d %H:%M"),
        record.id,
        record.display_total(),
        record.complexity,
        record.screen_count,
        features
    )
}

fn show_stats(store: &dyn HistoryStore) -> anyhow::Result<()> {
    let stats = summarize(&store.load()?);
    println!("Saved estimates: {}", stats.total_estimates);

    for (currency, totals) in &stats.by_currency {
        println!(
            "  {}: {} saved, average {}, range {} - {}",
            currency,
            totals.count,
            currency.format(totals.average()),
            currency.format(totals.lowest),
            currency.format(totals.highest)
        );
    }

    let mut popular: Vec<(&String, &u64)> = stats.feature_counts.iter().collect();
    popular.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    if !popular.is_empty() {
        println!();
        println!("Most selected features:");
        for (key, count) in popular.into_iter().take(5) {
            println!("  {:<20} {}", key, count);
        }
    }

    Ok(())
}

fn show_path(store: &JsonFileStore) {
    let path = store.path();
    println!("{}", path.display());
    if !path.exists() {
        println!("  (does not exist yet)");
    }
}
