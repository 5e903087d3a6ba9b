//! Feature catalog and complexity-tier pricing tables.
//!
//! The catalog is static configuration: it is built once and never mutated.
//! Per-feature prices are fixed when a feature is defined (the rounded mean
//! of its authored range), so pricing a request only ever adds whole numbers.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::currency::{CurrencyCode, round_whole};
use crate::error::{EstimateError, Result};

/// Coarse cost/time classification for features and whole projects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    #[default]
    Low,
    Medium,
    High,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 3] = [
        ComplexityTier::Low,
        ComplexityTier::Medium,
        ComplexityTier::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTier::Low => "low",
            ComplexityTier::Medium => "medium",
            ComplexityTier::High => "high",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComplexityTier {
    type Err = EstimateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ComplexityTier::Low),
            "medium" | "med" => Ok(ComplexityTier::Medium),
            "high" => Ok(ComplexityTier::High),
            _ => Err(EstimateError::InvalidComplexityTier(s.to_string())),
        }
    }
}

/// Authored cost range for a feature in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub typical: Decimal,
    pub maximum: Decimal,
}

impl CostRange {
    pub fn new(typical: Decimal, maximum: Decimal) -> Self {
        Self { typical, maximum }
    }

    /// Rounded mean of the range. This is the figure an estimate charges.
    pub fn average(&self) -> Decimal {
        round_whole((self.typical + self.maximum) / dec!(2))
    }
}

/// A priceable feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDefinition {
    /// Unique identifier, e.g. `authentication`.
    pub key: String,
    /// What building the feature involves.
    pub description: String,
    /// Author-assigned tier.
    pub complexity: ComplexityTier,
    /// Informational duration, e.g. `1-2 weeks`. Not used in pricing.
    pub time_estimate: String,
    ranges: BTreeMap<CurrencyCode, CostRange>,
    prices: BTreeMap<CurrencyCode, Decimal>,
}

impl FeatureDefinition {
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        complexity: ComplexityTier,
        time_estimate: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            complexity,
            time_estimate: time_estimate.into(),
            ranges: BTreeMap::new(),
            prices: BTreeMap::new(),
        }
    }

    /// Add the authored range for one currency. The charged price is its
    /// rounded mean.
    pub fn with_range(mut self, currency: CurrencyCode, typical: Decimal, maximum: Decimal) -> Self {
        let range = CostRange::new(typical, maximum);
        self.prices.insert(currency, range.average());
        self.ranges.insert(currency, range);
        self
    }

    /// Add a fixed price for one currency (a range with no spread). The
    /// figure is charged exactly as given.
    pub fn with_price(mut self, currency: CurrencyCode, price: Decimal) -> Self {
        self.ranges.insert(currency, CostRange::new(price, price));
        self.prices.insert(currency, price);
        self
    }

    /// The authored range in `currency`, if any.
    pub fn range(&self, currency: CurrencyCode) -> Option<&CostRange> {
        self.ranges.get(&currency)
    }

    /// The price charged for this feature in `currency`.
    pub fn price(&self, currency: CurrencyCode) -> Result<Decimal> {
        self.prices
            .get(&currency)
            .copied()
            .ok_or_else(|| EstimateError::MissingPrice {
                key: self.key.clone(),
                currency,
            })
    }

    fn validate(&self) -> Result<()> {
        for (&currency, range) in &self.ranges {
            check_amount(&self.key, currency, range.typical)?;
            check_amount(&self.key, currency, range.maximum)?;
            if range.typical > range.maximum {
                return Err(EstimateError::InvalidRange {
                    key: self.key.clone(),
                    currency,
                    typical: range.typical,
                    maximum: range.maximum,
                });
            }
        }
        for (&currency, &price) in &self.prices {
            check_amount(&self.key, currency, price)?;
        }
        Ok(())
    }
}

/// Catalog figures are whole, non-negative amounts so that pricing a request
/// is integer addition.
fn check_amount(key: &str, currency: CurrencyCode, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO || !amount.fract().is_zero() {
        return Err(EstimateError::InvalidPrice {
            key: key.to_string(),
            currency,
            amount,
        });
    }
    Ok(())
}

/// The full set of priceable features plus project-level pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    features: Vec<FeatureDefinition>,
    tier_base: BTreeMap<ComplexityTier, BTreeMap<CurrencyCode, Decimal>>,
    screen_unit: BTreeMap<CurrencyCode, Decimal>,
}

impl Catalog {
    /// Start assembling a custom catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The agency's standard catalog, built on first use.
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    /// Features in definition order.
    pub fn features(&self) -> &[FeatureDefinition] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the catalog defines no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Look up a feature, if defined.
    pub fn get(&self, key: &str) -> Option<&FeatureDefinition> {
        self.features.iter().find(|f| f.key == key)
    }

    /// Look up a feature, failing on keys the catalog does not define.
    pub fn feature(&self, key: &str) -> Result<&FeatureDefinition> {
        self.get(key).ok_or_else(|| EstimateError::UnknownFeatureKey {
            key: key.to_string(),
        })
    }

    /// Cost of a minimal project in `tier`, before screens or features.
    pub fn tier_base_price(&self, tier: ComplexityTier, currency: CurrencyCode) -> Result<Decimal> {
        self.tier_base
            .get(&tier)
            .and_then(|prices| prices.get(&currency))
            .copied()
            .ok_or_else(|| EstimateError::MissingPrice {
                key: format!("{} tier base", tier),
                currency,
            })
    }

    /// Cost of each screen.
    pub fn screen_unit_price(&self, currency: CurrencyCode) -> Result<Decimal> {
        self.screen_unit
            .get(&currency)
            .copied()
            .ok_or_else(|| EstimateError::MissingPrice {
                key: "screen".to_string(),
                currency,
            })
    }
}

/// Builder for [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    features: Vec<FeatureDefinition>,
    tier_base: BTreeMap<ComplexityTier, BTreeMap<CurrencyCode, Decimal>>,
    screen_unit: BTreeMap<CurrencyCode, Decimal>,
}

impl CatalogBuilder {
    /// Add a feature. Definition order is listing order.
    pub fn feature(mut self, feature: FeatureDefinition) -> Self {
        self.features.push(feature);
        self
    }

    /// Set a tier's base price in one currency.
    pub fn tier_base(mut self, tier: ComplexityTier, currency: CurrencyCode, amount: Decimal) -> Self {
        self.tier_base.entry(tier).or_default().insert(currency, amount);
        self
    }

    /// Set a tier's base price in the base currency and derive every other
    /// currency through the exchange-rate table.
    pub fn tier_base_converted(mut self, tier: ComplexityTier, base_amount: Decimal) -> Self {
        let prices = self.tier_base.entry(tier).or_default();
        for currency in CurrencyCode::ALL {
            prices.insert(currency, CurrencyCode::BASE.convert(base_amount, currency));
        }
        self
    }

    /// Set the per-screen price in one currency.
    pub fn screen_unit(mut self, currency: CurrencyCode, amount: Decimal) -> Self {
        self.screen_unit.insert(currency, amount);
        self
    }

    /// Set the per-screen price in the base currency and derive the rest.
    pub fn screen_unit_converted(mut self, base_amount: Decimal) -> Self {
        for currency in CurrencyCode::ALL {
            self.screen_unit
                .insert(currency, CurrencyCode::BASE.convert(base_amount, currency));
        }
        self
    }

    /// Finish the catalog. Feature keys must be unique, and every price
    /// must be a whole, non-negative amount.
    pub fn build(self) -> Result<Catalog> {
        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.key.as_str()) {
                return Err(EstimateError::DuplicateFeatureKey {
                    key: feature.key.clone(),
                });
            }
            feature.validate()?;
        }

        for (tier, prices) in &self.tier_base {
            let key = format!("{} tier base", tier);
            for (&currency, &amount) in prices {
                check_amount(&key, currency, amount)?;
            }
        }
        for (&currency, &amount) in &self.screen_unit {
            check_amount("screen", currency, amount)?;
        }

        Ok(Catalog {
            features: self.features,
            tier_base: self.tier_base,
            screen_unit: self.screen_unit,
        })
    }
}

static STANDARD_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    standard_catalog()
        .build()
        .expect("standard catalog is well-formed")
});

fn standard_catalog() -> CatalogBuilder {
    use ComplexityTier::{High, Low, Medium};
    use CurrencyCode::{Gbp, Usd, Zar};

    let feature = |key: &str, description: &str, tier, time: &str, zar: (i64, i64), usd: (i64, i64), gbp: (i64, i64)| {
        FeatureDefinition::new(key, description, tier, time)
            .with_range(Zar, Decimal::from(zar.0), Decimal::from(zar.1))
            .with_range(Usd, Decimal::from(usd.0), Decimal::from(usd.1))
            .with_range(Gbp, Decimal::from(gbp.0), Decimal::from(gbp.1))
    };

    Catalog::builder()
        .tier_base_converted(Low, dec!(15000))
        .tier_base_converted(Medium, dec!(30000))
        .tier_base_converted(High, dec!(60000))
        .screen_unit_converted(dec!(1500))
        .feature(feature(
            "authentication",
            "Email and password sign-up, login, password reset, and session handling",
            Low,
            "1-2 weeks",
            (12000, 16000),
            (400, 448),
            (320, 360),
        ))
        .feature(feature(
            "messaging",
            "One-to-one and group chat with delivery and read receipts",
            Medium,
            "2-3 weeks",
            (18000, 26000),
            (600, 860),
            (480, 690),
        ))
        .feature(feature(
            "payments",
            "Card payments through a hosted gateway, receipts, and refunds",
            High,
            "3-4 weeks",
            (25000, 35000),
            (830, 1160),
            (660, 930),
        ))
        .feature(feature(
            "push_notifications",
            "Targeted and broadcast push notifications on iOS and Android",
            Low,
            "1 week",
            (6000, 9000),
            (200, 300),
            (160, 240),
        ))
        .feature(feature(
            "geolocation",
            "Maps, live location, and geofenced points of interest",
            Medium,
            "2 weeks",
            (10000, 15000),
            (330, 500),
            (265, 400),
        ))
        .feature(feature(
            "offline_mode",
            "Local caching with background sync and conflict resolution",
            High,
            "3-4 weeks",
            (20000, 30000),
            (660, 1000),
            (530, 800),
        ))
        .feature(feature(
            "admin_dashboard",
            "Web dashboard for managing users, content, and reports",
            Medium,
            "2-3 weeks",
            (15000, 25000),
            (500, 830),
            (400, 665),
        ))
        .feature(feature(
            "analytics",
            "Event tracking, funnels, and usage reporting",
            Low,
            "1 week",
            (5000, 8000),
            (165, 265),
            (130, 210),
        ))
        .feature(feature(
            "social_login",
            "Sign in with Google, Apple, and Facebook",
            Low,
            "1 week",
            (4000, 7000),
            (130, 230),
            (105, 185),
        ))
        .feature(feature(
            "file_uploads",
            "Image and document uploads with cloud storage and previews",
            Medium,
            "1-2 weeks",
            (8000, 12000),
            (265, 400),
            (210, 320),
        ))
        .feature(feature(
            "search",
            "Full-text search with filters and sorting",
            Medium,
            "1-2 weeks",
            (9000, 14000),
            (300, 465),
            (240, 370),
        ))
        .feature(feature(
            "in_app_purchases",
            "Store-billed subscriptions and one-off purchases with receipt validation",
            High,
            "2-3 weeks",
            (18000, 28000),
            (600, 930),
            (480, 745),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_is_rounded_mean() {
        assert_eq!(CostRange::new(dec!(12000), dec!(16000)).average(), dec!(14000));
        assert_eq!(CostRange::new(dec!(265), dec!(400)).average(), dec!(333));
        assert_eq!(CostRange::new(dec!(100), dec!(100)).average(), dec!(100));
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 12);

        let auth = catalog.feature("authentication").unwrap();
        assert_eq!(auth.complexity, ComplexityTier::Low);
        assert_eq!(auth.price(CurrencyCode::Zar).unwrap(), dec!(14000));
        assert_eq!(auth.price(CurrencyCode::Usd).unwrap(), dec!(424));
        assert_eq!(auth.price(CurrencyCode::Gbp).unwrap(), dec!(340));

        assert_eq!(
            catalog
                .tier_base_price(ComplexityTier::Low, CurrencyCode::Usd)
                .unwrap(),
            dec!(1500)
        );
        assert_eq!(
            catalog
                .tier_base_price(ComplexityTier::High, CurrencyCode::Gbp)
                .unwrap(),
            dec!(4800)
        );
        assert_eq!(catalog.screen_unit_price(CurrencyCode::Usd).unwrap(), dec!(150));
        assert_eq!(catalog.screen_unit_price(CurrencyCode::Gbp).unwrap(), dec!(120));
    }

    #[test]
    fn test_every_standard_feature_is_priced_in_every_currency() {
        for feature in Catalog::standard().features() {
            for currency in CurrencyCode::ALL {
                let price = feature.price(currency).unwrap();
                assert_eq!(price, price.trunc(), "{} {} not whole", feature.key, currency);
            }
        }
    }

    #[test]
    fn test_unknown_key() {
        let err = Catalog::standard().feature("teleportation").unwrap_err();
        assert_eq!(
            err,
            EstimateError::UnknownFeatureKey {
                key: "teleportation".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = Catalog::builder()
            .feature(FeatureDefinition::new("auth", "", ComplexityTier::Low, ""))
            .feature(FeatureDefinition::new("auth", "", ComplexityTier::High, ""))
            .build();
        assert_eq!(
            result.unwrap_err(),
            EstimateError::DuplicateFeatureKey {
                key: "auth".to_string()
            }
        );
    }

    #[test]
    fn test_missing_price() {
        let feature = FeatureDefinition::new("auth", "", ComplexityTier::Low, "")
            .with_price(CurrencyCode::Zar, dec!(14000));
        assert!(matches!(
            feature.price(CurrencyCode::Gbp),
            Err(EstimateError::MissingPrice { currency: CurrencyCode::Gbp, .. })
        ));

        let catalog = Catalog::builder().build().unwrap();
        assert!(catalog
            .tier_base_price(ComplexityTier::Low, CurrencyCode::Zar)
            .is_err());
        assert!(catalog.screen_unit_price(CurrencyCode::Zar).is_err());
    }

    #[test]
    fn test_fixed_price_is_kept_exactly() {
        let feature = FeatureDefinition::new("auth", "", ComplexityTier::Low, "")
            .with_price(CurrencyCode::Usd, dec!(12.5));
        assert_eq!(feature.price(CurrencyCode::Usd).unwrap(), dec!(12.5));

        // Fractional figures are caught when the catalog is built.
        let err = Catalog::builder().feature(feature).build().unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidPrice {
                key: "auth".to_string(),
                currency: CurrencyCode::Usd,
                amount: dec!(12.5),
            }
        );
    }

    #[test]
    fn test_fractional_tier_base_rejected() {
        let err = Catalog::builder()
            .tier_base(ComplexityTier::Low, CurrencyCode::Zar, dec!(15000.75))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidPrice {
                key: "low tier base".to_string(),
                currency: CurrencyCode::Zar,
                amount: dec!(15000.75),
            }
        );
    }

    #[test]
    fn test_negative_screen_unit_rejected() {
        let err = Catalog::builder()
            .screen_unit(CurrencyCode::Zar, dec!(-1500))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidPrice {
                key: "screen".to_string(),
                currency: CurrencyCode::Zar,
                amount: dec!(-1500),
            }
        );
    }

    #[test]
    fn test_negative_feature_price_rejected() {
        let result = Catalog::builder()
            .feature(
                FeatureDefinition::new("auth", "", ComplexityTier::Low, "")
                    .with_price(CurrencyCode::Gbp, dec!(-10)),
            )
            .build();
        assert!(matches!(
            result,
            Err(EstimateError::InvalidPrice { currency: CurrencyCode::Gbp, .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Catalog::builder()
            .feature(
                FeatureDefinition::new("auth", "", ComplexityTier::Low, "")
                    .with_range(CurrencyCode::Zar, dec!(900), dec!(100)),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidRange {
                key: "auth".to_string(),
                currency: CurrencyCode::Zar,
                typical: dec!(900),
                maximum: dec!(100),
            }
        );
    }

    #[test]
    fn test_odd_range_mean_is_accepted() {
        // Whole bounds with an odd sum round to a whole price.
        let catalog = Catalog::builder()
            .feature(
                FeatureDefinition::new("geo", "", ComplexityTier::Medium, "")
                    .with_range(CurrencyCode::Gbp, dec!(265), dec!(400)),
            )
            .tier_base(ComplexityTier::Medium, CurrencyCode::Gbp, dec!(0))
            .build()
            .unwrap();
        assert_eq!(
            catalog.feature("geo").unwrap().price(CurrencyCode::Gbp).unwrap(),
            dec!(333)
        );
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("HIGH".parse::<ComplexityTier>().unwrap(), ComplexityTier::High);
        assert_eq!("med".parse::<ComplexityTier>().unwrap(), ComplexityTier::Medium);
        assert!(matches!(
            "extreme".parse::<ComplexityTier>(),
            Err(EstimateError::InvalidComplexityTier(_))
        ));
    }
}
