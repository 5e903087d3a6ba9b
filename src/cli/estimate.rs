//! Catalog listing and estimate commands.

use std::collections::HashSet;
use std::fmt::Write as _;

use clap::Args;

use crate::config::AppConfig;
use crate::estimation::{
    CalculatorState, Catalog, ComplexityTier, CurrencyCode, EstimateResult, filter_by_complexity,
};
use crate::history::{HistoryStore, JsonFileStore, record_estimate};

#[derive(Args, Debug, Clone)]
pub struct FeaturesArgs {
    /// Only show features of this tier (repeatable)
    #[arg(short, long = "tier")]
    pub tiers: Vec<ComplexityTier>,

    /// Currency to price features in
    #[arg(short, long)]
    pub currency: Option<CurrencyCode>,
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Feature to include (repeatable)
    #[arg(short, long = "feature")]
    pub features: Vec<String>,

    /// Number of screens
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub screens: i64,

    /// Project complexity tier
    #[arg(short, long)]
    pub tier: Option<ComplexityTier>,

    /// Currency to price in
    #[arg(short, long)]
    pub currency: Option<CurrencyCode>,

    /// Append the estimate to the saved history
    #[arg(long)]
    pub save: bool,
}

/// List catalog features.
pub fn run_features_command(args: FeaturesArgs, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = Catalog::standard();
    let currency = args.currency.unwrap_or(config.currency);
    let tiers: HashSet<ComplexityTier> = args.tiers.into_iter().collect();

    let features = filter_by_complexity(catalog, &tiers);
    let key_width = features.iter().map(|f| f.key.len()).max().unwrap_or(0);

    println!("Features ({}):", currency);
    println!();
    for feature in features {
        let price = feature.price(currency)?;
        println!(
            "  {:width$}  {:<6}  {:>10}  {:<9}  {}",
            feature.key,
            feature.complexity,
            currency.format(price),
            feature.time_estimate,
            feature.description,
            width = key_width
        );
    }

    Ok(())
}

/// Price a feature selection and optionally save it.
pub fn run_estimate_command(args: EstimateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let catalog = Catalog::standard();

    let mut state = CalculatorState::new(catalog)?;
    state.set_currency(catalog, args.currency.unwrap_or(config.currency))?;
    state.set_complexity(args.tier.unwrap_or(config.complexity));
    state.set_screen_count(args.screens)?;
    for key in &args.features {
        // Repeating a flag should not switch the feature back off.
        if !state.features().iter().any(|f| f.key == *key && f.enabled) {
            state.toggle(key)?;
        }
    }

    let result = state.estimate(catalog)?;
    print!("{}", render_estimate(&state, &result));

    if args.save {
        let store = JsonFileStore::new(&config.history_path);
        let record = state.snapshot(catalog)?;
        let id = record.id;
        let history = record_estimate(&store as &dyn HistoryStore, record)?;
        tracing::info!(%id, count = history.len(), "Saved estimate");
        println!();
        println!("Saved as {} ({} in history)", id, history.len());
    }

    Ok(())
}

fn render_estimate(state: &CalculatorState, result: &EstimateResult) -> String {
    let currency = result.currency;
    let mut out = String::new();

    let _ = writeln!(out, "Estimate ({}, {} tier)", currency, state.complexity());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<24} {:>12}",
        "Base price",
        currency.format(result.tier_base_price)
    );
    let _ = writeln!(
        out,
        "  {:<24} {:>12}",
        format!("Screens ({})", state.screen_count()),
        currency.format(result.screen_cost)
    );
    for feature in state.features().iter().filter(|f| f.enabled) {
        let _ = writeln!(out, "  {:<24} {:>12}", feature.key, currency.format(feature.cost));
    }
    let _ = writeln!(out, "  {:-<37}", "");
    let _ = writeln!(out, "  {:<24} {:>12}", "Total", result.display_total());
    let _ = writeln!(
        out,
        "  {} feature(s), about {} week(s)",
        result.selected_feature_count, result.estimated_weeks
    );
    out
}
