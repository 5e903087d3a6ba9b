//! Estimate requests and the pricing function.

use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, ComplexityTier, FeatureDefinition};
use super::currency::CurrencyCode;
use crate::error::{EstimateError, Result};

/// Weeks of work assumed per selected feature.
pub const WEEKS_PER_FEATURE: u32 = 2;

/// What the caller wants priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub selected_feature_keys: BTreeSet<String>,
    pub screen_count: u32,
    pub complexity: ComplexityTier,
    pub currency: CurrencyCode,
}

impl Default for EstimateRequest {
    fn default() -> Self {
        Self {
            selected_feature_keys: BTreeSet::new(),
            screen_count: 1,
            complexity: ComplexityTier::default(),
            currency: CurrencyCode::default(),
        }
    }
}

impl EstimateRequest {
    /// An empty selection with the default screen count, tier and currency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select one feature. Selecting a key twice counts it once.
    pub fn with_feature(mut self, key: impl Into<String>) -> Self {
        self.selected_feature_keys.insert(key.into());
        self
    }

    /// Select several features.
    pub fn with_features<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_feature_keys
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Set the screen count, rejecting values outside `0..=u32::MAX`.
    pub fn with_screen_count(mut self, count: i64) -> Result<Self> {
        self.screen_count = validate_screen_count(count)?;
        Ok(self)
    }

    /// Set the project tier.
    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the currency the estimate is priced in.
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }
}

/// Check a caller-supplied screen count. Negative counts and counts too
/// large for `u32` are rejected.
pub fn validate_screen_count(count: i64) -> Result<u32> {
    u32::try_from(count).map_err(|_| EstimateError::InvalidScreenCount { count })
}

/// A computed estimate. Not stored unless the caller saves a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub currency: CurrencyCode,
    pub total_cost: Decimal,
    pub selected_feature_count: usize,
    pub selected_feature_cost: Decimal,
    pub tier_base_price: Decimal,
    pub screen_cost: Decimal,
    pub estimated_weeks: u32,
}

impl EstimateResult {
    /// Total rendered in the estimate's currency.
    pub fn display_total(&self) -> String {
        self.currency.format(self.total_cost)
    }
}

/// Price a request against a catalog.
///
/// `total = tier base + screens × screen unit + Σ selected feature prices`,
/// recomputed from scratch on every call.
pub fn compute_estimate(catalog: &Catalog, request: &EstimateRequest) -> Result<EstimateResult> {
    let currency = request.currency;

    let selected_feature_cost =
        request
            .selected_feature_keys
            .iter()
            .try_fold(Decimal::ZERO, |acc, key| {
                let price = catalog.feature(key)?.price(currency)?;
                Ok::<_, EstimateError>(acc + price)
            })?;

    let tier_base_price = catalog.tier_base_price(request.complexity, currency)?;
    let screen_cost = catalog.screen_unit_price(currency)? * Decimal::from(request.screen_count);
    let selected_feature_count = request.selected_feature_keys.len();

    Ok(EstimateResult {
        currency,
        total_cost: tier_base_price + screen_cost + selected_feature_cost,
        selected_feature_count,
        selected_feature_cost,
        tier_base_price,
        screen_cost,
        estimated_weeks: WEEKS_PER_FEATURE.saturating_mul(
            u32::try_from(selected_feature_count).unwrap_or(u32::MAX),
        ),
    })
}

/// Features whose tier is in `tiers`. An empty set applies no filter.
pub fn filter_by_complexity<'a>(
    catalog: &'a Catalog,
    tiers: &HashSet<ComplexityTier>,
) -> Vec<&'a FeatureDefinition> {
    catalog
        .features()
        .iter()
        .filter(|f| tiers.is_empty() || tiers.contains(&f.complexity))
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::builder()
            .tier_base(ComplexityTier::Low, CurrencyCode::Zar, dec!(15000))
            .tier_base(ComplexityTier::High, CurrencyCode::Zar, dec!(60000))
            .screen_unit(CurrencyCode::Zar, dec!(1500))
            .feature(
                FeatureDefinition::new("auth", "Login", ComplexityTier::Low, "1 week")
                    .with_price(CurrencyCode::Zar, dec!(14000)),
            )
            .feature(
                FeatureDefinition::new("chat", "Chat", ComplexityTier::High, "3 weeks")
                    .with_price(CurrencyCode::Zar, dec!(22000)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = EstimateRequest::new();
        assert_eq!(request.screen_count, 1);
        assert_eq!(request.complexity, ComplexityTier::Low);
        assert_eq!(request.currency, CurrencyCode::Zar);
        assert!(request.selected_feature_keys.is_empty());
    }

    #[test]
    fn test_breakdown() {
        let request = EstimateRequest::new()
            .with_features(["auth", "chat"])
            .with_screen_count(4)
            .unwrap()
            .with_complexity(ComplexityTier::High);

        let result = compute_estimate(&small_catalog(), &request).unwrap();
        assert_eq!(result.tier_base_price, dec!(60000));
        assert_eq!(result.screen_cost, dec!(6000));
        assert_eq!(result.selected_feature_cost, dec!(36000));
        assert_eq!(result.total_cost, dec!(102000));
        assert_eq!(result.selected_feature_count, 2);
        assert_eq!(result.estimated_weeks, 4);
        assert_eq!(result.display_total(), "R 102,000");
    }

    #[test]
    fn test_duplicate_selection_counts_once() {
        let request = EstimateRequest::new()
            .with_feature("auth")
            .with_feature("auth");
        let result = compute_estimate(&small_catalog(), &request).unwrap();
        assert_eq!(result.selected_feature_count, 1);
        assert_eq!(result.selected_feature_cost, dec!(14000));
    }

    #[test]
    fn test_zero_screens() {
        let request = EstimateRequest::new().with_screen_count(0).unwrap();
        let result = compute_estimate(&small_catalog(), &request).unwrap();
        assert_eq!(result.screen_cost, Decimal::ZERO);
        assert_eq!(result.total_cost, dec!(15000));
    }

    #[test]
    fn test_negative_screens_rejected() {
        assert_eq!(
            EstimateRequest::new().with_screen_count(-1).unwrap_err(),
            EstimateError::InvalidScreenCount { count: -1 }
        );
    }

    #[test]
    fn test_screen_count_bounds() {
        assert_eq!(validate_screen_count(i64::from(u32::MAX)).unwrap(), u32::MAX);

        let too_many = i64::from(u32::MAX) + 1;
        assert_eq!(
            validate_screen_count(too_many).unwrap_err(),
            EstimateError::InvalidScreenCount { count: too_many }
        );
        assert!(EstimateRequest::new().with_screen_count(i64::MAX).is_err());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let request = EstimateRequest::new().with_feature("auth").with_feature("bogus");
        assert_eq!(
            compute_estimate(&small_catalog(), &request).unwrap_err(),
            EstimateError::UnknownFeatureKey {
                key: "bogus".to_string()
            }
        );
    }

    #[test]
    fn test_missing_currency_is_an_error() {
        let request = EstimateRequest::new().with_currency(CurrencyCode::Usd);
        assert!(matches!(
            compute_estimate(&small_catalog(), &request),
            Err(EstimateError::MissingPrice { currency: CurrencyCode::Usd, .. })
        ));
    }

    #[test]
    fn test_empty_catalog_prices_base_and_screens() {
        let catalog = Catalog::builder()
            .tier_base(ComplexityTier::Low, CurrencyCode::Zar, dec!(15000))
            .screen_unit(CurrencyCode::Zar, dec!(1500))
            .build()
            .unwrap();
        let result = compute_estimate(&catalog, &EstimateRequest::new()).unwrap();
        assert_eq!(result.total_cost, dec!(16500));
        assert_eq!(result.estimated_weeks, 0);
    }

    #[test]
    fn test_filter_by_complexity() {
        let catalog = small_catalog();

        let all = filter_by_complexity(&catalog, &HashSet::new());
        assert_eq!(all.len(), 2);

        let high = filter_by_complexity(&catalog, &HashSet::from([ComplexityTier::High]));
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].key, "chat");

        let medium = filter_by_complexity(&catalog, &HashSet::from([ComplexityTier::Medium]));
        assert!(medium.is_empty());
    }
}
