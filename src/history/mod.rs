//! Saved-estimate history.
//!
//! Saved estimates are append-only snapshots. The record shape lives here;
//! where records are kept is up to the injected [`HistoryStore`].

mod analytics;
mod record;
mod store;

pub use analytics::{CurrencyStats, HistoryStats, summarize};
pub use record::{SAVED_ESTIMATE_VERSION, SavedEstimate, save_estimate};
pub use store::{HistoryStore, JsonFileStore, MemoryStore, default_history_path, record_estimate};
