//! Saved-estimate records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;
use crate::estimation::{ComplexityTier, CurrencyCode, EstimateResult, FeatureState};

/// Newest record layout this crate reads and writes.
pub const SAVED_ESTIMATE_VERSION: u32 = 1;

fn default_version() -> u32 {
    SAVED_ESTIMATE_VERSION
}

/// A persisted snapshot of an estimate.
///
/// The feature list is a full copy of every feature's state and cost at save
/// time, so the record stays meaningful if the catalog changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEstimate {
    #[serde(default = "default_version")]
    pub version: u32,
    pub id: Uuid,
    pub features: Vec<FeatureState>,
    pub total_cost: Decimal,
    /// Currency `total_cost` and every feature cost are denominated in.
    pub currency: CurrencyCode,
    pub complexity: ComplexityTier,
    pub screen_count: u32,
    pub saved_at: DateTime<Utc>,
}

impl SavedEstimate {
    /// Capture a freshly computed estimate.
    pub fn new(
        features: Vec<FeatureState>,
        result: &EstimateResult,
        complexity: ComplexityTier,
        screen_count: u32,
    ) -> Self {
        Self {
            version: SAVED_ESTIMATE_VERSION,
            id: Uuid::new_v4(),
            features,
            total_cost: result.total_cost,
            currency: result.currency,
            complexity,
            screen_count,
            saved_at: Utc::now(),
        }
    }

    /// Features that were switched on when the estimate was saved.
    pub fn enabled_features(&self) -> impl Iterator<Item = &FeatureState> {
        self.features.iter().filter(|f| f.enabled)
    }

    /// Total rendered in the currency it was saved in.
    pub fn display_total(&self) -> String {
        self.currency.format(self.total_cost)
    }

    /// Decode one stored record.
    ///
    /// The `version` tag is read before anything else, so a record written
    /// by a newer layout is reported as such even when its other fields no
    /// longer decode. A record without a tag is read as the current layout.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StorageError> {
        let version = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(u64::from(SAVED_ESTIMATE_VERSION));

        if version > u64::from(SAVED_ESTIMATE_VERSION) {
            let id = value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("<no id>");
            return Err(StorageError::UnsupportedVersion {
                id: id.to_string(),
                found: u32::try_from(version).unwrap_or(u32::MAX),
                supported: SAVED_ESTIMATE_VERSION,
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}

/// Append a record. History is chronological, oldest first; nothing is
/// deduplicated or dropped.
pub fn save_estimate(mut history: Vec<SavedEstimate>, record: SavedEstimate) -> Vec<SavedEstimate> {
    history.push(record);
    history
}
