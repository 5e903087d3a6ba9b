//! appquote: cost and timeline estimates for app-development projects.
//!
//! The [`estimation`] module is a pure pricing engine over a static feature
//! catalog. [`history`] defines saved-estimate records and the storage
//! adapters callers inject to persist them.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimation;
pub mod history;

pub use error::{ConfigError, EstimateError, StorageError};
