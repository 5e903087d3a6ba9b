//! Error types for appquote.

use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::estimation::CurrencyCode;

/// Errors raised by the estimation engine on malformed input.
///
/// None of these are transient: each one means the caller handed the engine
/// something outside the catalog or outside a closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// A feature key that the catalog does not define.
    #[error("Unknown feature key: {key}")]
    UnknownFeatureKey { key: String },

    /// A negative screen count, or one too large to represent.
    #[error("Invalid screen count: {count}")]
    InvalidScreenCount { count: i64 },

    /// A currency code outside the supported set.
    #[error("Invalid currency '{0}', expected one of ZAR, USD, GBP")]
    InvalidCurrency(String),

    /// A complexity tier outside the supported set.
    #[error("Invalid complexity tier '{0}', expected 'low', 'medium', or 'high'")]
    InvalidComplexityTier(String),

    /// A catalog entry has no figure for the requested currency.
    #[error("No {currency} price for {key}")]
    MissingPrice { key: String, currency: CurrencyCode },

    /// A catalog figure that is fractional or negative.
    #[error("Invalid {currency} price {amount} for {key}: prices must be whole and non-negative")]
    InvalidPrice {
        key: String,
        currency: CurrencyCode,
        amount: Decimal,
    },

    /// A cost range whose typical figure exceeds its maximum.
    #[error("Invalid {currency} range for {key}: typical {typical} exceeds maximum {maximum}")]
    InvalidRange {
        key: String,
        currency: CurrencyCode,
        typical: Decimal,
        maximum: Decimal,
    },

    /// The same key was registered twice while building a catalog.
    #[error("Duplicate feature key: {key}")]
    DuplicateFeatureKey { key: String },
}

/// Errors from a saved-estimate storage adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Saved estimate {id} has schema version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        id: String,
        found: u32,
        supported: u32,
    },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Errors resolving configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Result type for estimation operations.
pub type Result<T> = std::result::Result<T, EstimateError>;
