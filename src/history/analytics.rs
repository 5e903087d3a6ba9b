//! Aggregates over saved-estimate history.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::estimation::CurrencyCode;
use crate::history::SavedEstimate;

/// Totals for the estimates saved in one currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyStats {
    pub count: u64,
    pub total: Decimal,
    pub lowest: Decimal,
    pub highest: Decimal,
}

impl CurrencyStats {
    /// Mean total, rounded to whole units.
    pub fn average(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        crate::estimation::round_whole(self.total / Decimal::from(self.count))
    }
}

/// Summary of a history list. Amounts are never mixed across currencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_estimates: u64,
    pub by_currency: BTreeMap<CurrencyCode, CurrencyStats>,
    /// How often each feature was enabled across all saved estimates.
    pub feature_counts: BTreeMap<String, u64>,
}

/// Summarize saved estimates.
pub fn summarize(history: &[SavedEstimate]) -> HistoryStats {
    let mut stats = HistoryStats::default();

    for record in history {
        stats.total_estimates += 1;

        let entry = stats.by_currency.entry(record.currency).or_default();
        if entry.count == 0 {
            entry.lowest = record.total_cost;
            entry.highest = record.total_cost;
        } else {
            entry.lowest = entry.lowest.min(record.total_cost);
            entry.highest = entry.highest.max(record.total_cost);
        }
        entry.count += 1;
        entry.total += record.total_cost;

        for feature in record.enabled_features() {
            *stats.feature_counts.entry(feature.key.clone()).or_default() += 1;
        }
    }

    stats
}
