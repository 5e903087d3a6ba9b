//! Configuration resolved from the environment.
//!
//! Variables (a `.env` file is honored when the binary loads it):
//! - `APPQUOTE_HISTORY_PATH`: saved-estimate file (default `~/.appquote/estimates.json`)
//! - `APPQUOTE_CURRENCY`: default display currency (default `ZAR`)
//! - `APPQUOTE_TIER`: default complexity tier (default `low`)
//! - `APPQUOTE_LOG_FORMAT`: `json` for JSON log lines (read by the binary)

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::estimation::{ComplexityTier, CurrencyCode};
use crate::history::default_history_path;

pub const HISTORY_PATH_VAR: &str = "APPQUOTE_HISTORY_PATH";
pub const CURRENCY_VAR: &str = "APPQUOTE_CURRENCY";
pub const TIER_VAR: &str = "APPQUOTE_TIER";
pub const LOG_FORMAT_VAR: &str = "APPQUOTE_LOG_FORMAT";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub history_path: PathBuf,
    pub currency: CurrencyCode,
    pub complexity: ComplexityTier,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            currency: CurrencyCode::default(),
            complexity: ComplexityTier::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let history_path = non_empty(lookup(HISTORY_PATH_VAR))
            .map(PathBuf::from)
            .unwrap_or(defaults.history_path);
        let currency = parse_var(&lookup, CURRENCY_VAR)?.unwrap_or(defaults.currency);
        let complexity = parse_var(&lookup, TIER_VAR)?.unwrap_or(defaults.complexity);

        Ok(Self {
            history_path,
            currency,
            complexity,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}
