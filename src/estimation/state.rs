//! Caller-side calculator state: which features are on, and what they cost
//! in the active currency.
//!
//! The catalog is never written to. Switching currency produces new feature
//! states through [`reprice`]; toggling produces new states through
//! [`toggle_feature`].

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, ComplexityTier};
use super::cost::{EstimateRequest, EstimateResult, compute_estimate, validate_screen_count};
use super::currency::CurrencyCode;
use crate::error::{EstimateError, Result};
use crate::history::SavedEstimate;

/// One feature as the calculator currently shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureState {
    pub key: String,
    pub enabled: bool,
    /// Price in the currency the state was last priced in.
    pub cost: Decimal,
}

/// Disabled states for every catalog feature, priced in `currency`.
pub fn initial_states(catalog: &Catalog, currency: CurrencyCode) -> Result<Vec<FeatureState>> {
    catalog
        .features()
        .iter()
        .map(|f| {
            Ok(FeatureState {
                key: f.key.clone(),
                enabled: false,
                cost: f.price(currency)?,
            })
        })
        .collect()
}

/// Re-denominate every feature's cost in `currency`. Enabled flags are kept.
pub fn reprice(
    catalog: &Catalog,
    features: &[FeatureState],
    currency: CurrencyCode,
) -> Result<Vec<FeatureState>> {
    features
        .iter()
        .map(|state| {
            Ok(FeatureState {
                key: state.key.clone(),
                enabled: state.enabled,
                cost: catalog.feature(&state.key)?.price(currency)?,
            })
        })
        .collect()
}

/// Flip one feature's enabled flag, leaving every other state untouched.
pub fn toggle_feature(features: &[FeatureState], key: &str) -> Result<Vec<FeatureState>> {
    if !features.iter().any(|f| f.key == key) {
        return Err(EstimateError::UnknownFeatureKey {
            key: key.to_string(),
        });
    }

    Ok(features
        .iter()
        .map(|f| {
            if f.key == key {
                FeatureState {
                    enabled: !f.enabled,
                    ..f.clone()
                }
            } else {
                f.clone()
            }
        })
        .collect())
}

/// Keys of the enabled features.
pub fn selected_keys(features: &[FeatureState]) -> BTreeSet<String> {
    features
        .iter()
        .filter(|f| f.enabled)
        .map(|f| f.key.clone())
        .collect()
}

/// Everything a calculator front end tracks for pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorState {
    features: Vec<FeatureState>,
    currency: CurrencyCode,
    complexity: ComplexityTier,
    screen_count: u32,
}

impl CalculatorState {
    /// All features off, one screen, low tier, base currency.
    pub fn new(catalog: &Catalog) -> Result<Self> {
        let request = EstimateRequest::default();
        Ok(Self {
            features: initial_states(catalog, request.currency)?,
            currency: request.currency,
            complexity: request.complexity,
            screen_count: request.screen_count,
        })
    }

    /// Feature states in catalog order.
    pub fn features(&self) -> &[FeatureState] {
        &self.features
    }

    /// The active currency.
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// The selected project tier.
    pub fn complexity(&self) -> ComplexityTier {
        self.complexity
    }

    /// The number of screens.
    pub fn screen_count(&self) -> u32 {
        self.screen_count
    }

    /// Switch currency and reprice every feature.
    pub fn set_currency(&mut self, catalog: &Catalog, currency: CurrencyCode) -> Result<()> {
        self.features = reprice(catalog, &self.features, currency)?;
        self.currency = currency;
        Ok(())
    }

    /// Flip one feature on or off.
    pub fn toggle(&mut self, key: &str) -> Result<()> {
        self.features = toggle_feature(&self.features, key)?;
        Ok(())
    }

    /// Change the project tier.
    pub fn set_complexity(&mut self, complexity: ComplexityTier) {
        self.complexity = complexity;
    }

    /// Change the screen count. Invalid counts leave the state unchanged.
    pub fn set_screen_count(&mut self, count: i64) -> Result<()> {
        self.screen_count = validate_screen_count(count)?;
        Ok(())
    }

    /// The request the current state describes.
    pub fn request(&self) -> EstimateRequest {
        EstimateRequest {
            selected_feature_keys: selected_keys(&self.features),
            screen_count: self.screen_count,
            complexity: self.complexity,
            currency: self.currency,
        }
    }

    /// Price the current state.
    pub fn estimate(&self, catalog: &Catalog) -> Result<EstimateResult> {
        compute_estimate(catalog, &self.request())
    }

    /// Price the current state and capture it as a saved-estimate record.
    pub fn snapshot(&self, catalog: &Catalog) -> Result<SavedEstimate> {
        let result = self.estimate(catalog)?;
        Ok(SavedEstimate::new(
            self.features.clone(),
            &result,
            self.complexity,
            self.screen_count,
        ))
    }
}
