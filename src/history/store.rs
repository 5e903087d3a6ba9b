//! Storage adapters for saved-estimate history.
//!
//! The engine never owns persistence. Callers inject a [`HistoryStore`];
//! [`JsonFileStore`] keeps the whole history as one JSON list on disk and
//! [`MemoryStore`] keeps it in process.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::history::record::{SavedEstimate, save_estimate};

/// Synchronous load/save of the full history list.
pub trait HistoryStore: Send + Sync {
    /// Read every saved estimate, oldest first.
    fn load(&self) -> Result<Vec<SavedEstimate>, StorageError>;

    /// Replace the stored history. Last write wins.
    fn save(&self, history: &[SavedEstimate]) -> Result<(), StorageError>;
}

/// Load, append one record, and write the history back.
pub fn record_estimate(
    store: &dyn HistoryStore,
    record: SavedEstimate,
) -> Result<Vec<SavedEstimate>, StorageError> {
    let history = save_estimate(store.load()?, record);
    store.save(&history)?;
    Ok(history)
}

/// Get the default history file path (~/.appquote/estimates.json).
pub fn default_history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".appquote")
        .join("estimates.json")
}

/// History stored as a single pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<SavedEstimate>, StorageError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if data.trim().is_empty() {
            tracing::warn!("History file {} is empty", self.path.display());
            return Ok(Vec::new());
        }

        let raw: Vec<serde_json::Value> = serde_json::from_str(&data)?;
        let history = raw
            .into_iter()
            .map(SavedEstimate::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Loaded {} saved estimates from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }

    fn save(&self, history: &[SavedEstimate]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(history)?;

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(
            "Saved {} estimates to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-process history, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SavedEstimate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<SavedEstimate>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.clone())
    }

    fn save(&self, history: &[SavedEstimate]) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        *records = history.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use super::*;
    use crate::estimation::{CalculatorState, Catalog, CurrencyCode};
    use crate::history::SAVED_ESTIMATE_VERSION;

    fn snapshot(toggle: &str, currency: CurrencyCode) -> SavedEstimate {
        let catalog = Catalog::standard();
        let mut calc = CalculatorState::new(catalog).unwrap();
        calc.toggle(toggle).unwrap();
        calc.set_currency(catalog, currency).unwrap();
        calc.snapshot(catalog).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_round_trip_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("estimates.json");
        let store = JsonFileStore::new(&path);

        let first = snapshot("authentication", CurrencyCode::Zar);
        let second = snapshot("payments", CurrencyCode::Gbp);

        record_estimate(&store, first.clone()).unwrap();
        let history = record_estimate(&store, second.clone()).unwrap();
        assert_eq!(history.len(), 2);

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), vec![first, second]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_layout_is_a_versioned_list() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("estimates.json"));
        store
            .save(&[snapshot("authentication", CurrencyCode::Zar)])
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        let list = raw.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["version"], SAVED_ESTIMATE_VERSION);
        assert_eq!(list[0]["currency"], "ZAR");
        assert_eq!(list[0]["total_cost"], "30500");
    }

    #[test]
    fn test_newer_version_fails_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("estimates.json"));
        let mut record = snapshot("authentication", CurrencyCode::Zar);
        record.version = SAVED_ESTIMATE_VERSION + 1;
        store.save(&[record]).unwrap();

        assert!(matches!(
            store.load(),
            Err(StorageError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_newer_layout_fails_load_with_version_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estimates.json");
        let current = serde_json::to_value(snapshot("authentication", CurrencyCode::Zar)).unwrap();
        let future = serde_json::json!({
            "version": SAVED_ESTIMATE_VERSION + 1,
            "id": "0b6f7a8e-2f7c-4c55-8f7d-1d9c1e3a2b44",
            "totals": [{"amount": "30500", "currency": "ZAR"}]
        });
        std::fs::write(&path, serde_json::to_string(&vec![current, future]).unwrap()).unwrap();

        let store = JsonFileStore::new(&path);
        match store.load() {
            Err(StorageError::UnsupportedVersion { id, found, .. }) => {
                assert_eq!(id, "0b6f7a8e-2f7c-4c55-8f7d-1d9c1e3a2b44");
                assert_eq!(found, SAVED_ESTIMATE_VERSION + 1);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("estimates.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_memory_store_appends() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            record_estimate(&store, snapshot("search", CurrencyCode::Usd)).unwrap();
        }
        let history = store.load().unwrap();
        assert_eq!(history.len(), 3);
        // 1500 + 150 + 383
        assert!(history.iter().all(|r| r.total_cost == dec!(2033)));
    }

    #[test]
    fn test_default_history_path() {
        let path = default_history_path();
        assert!(path.ends_with("estimates.json"));
        assert!(path.to_string_lossy().contains(".appquote"));
    }
}
