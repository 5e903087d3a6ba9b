//! Cost and timeline estimation for app projects.
//!
//! Estimates are based on:
//! - A static catalog of priceable features, each priced per currency
//! - A base price per complexity tier
//! - A per-screen unit price
//!
//! Every operation here is a pure function over its inputs. The catalog is
//! shared immutable configuration; request and feature state belong to the
//! caller.

mod catalog;
mod cost;
mod currency;
mod state;

pub use catalog::{Catalog, CatalogBuilder, ComplexityTier, CostRange, FeatureDefinition};
pub use cost::{
    EstimateRequest, EstimateResult, WEEKS_PER_FEATURE, compute_estimate, filter_by_complexity,
    validate_screen_count,
};
pub use currency::CurrencyCode;
pub(crate) use currency::round_whole;
pub use state::{
    CalculatorState, FeatureState, initial_states, reprice, selected_keys, toggle_feature,
};
