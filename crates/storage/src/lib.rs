//! Threshold Persistence
//!
//! Load/save of the single calibrated eye-closure threshold. One
//! global calibration per installation, stored as a small JSON record
//! with a timestamp for traceability.
//!
//! Persistence problems are never fatal: an unreadable store loads the
//! documented default, a failed save leaves the in-memory threshold
//! authoritative. Both surface only as log warnings.

mod threshold_store;

pub use threshold_store::{
    FileThresholdStore, MemoryThresholdStore, ThresholdRecord, ThresholdStore,
    DEFAULT_EAR_THRESHOLD,
};

use thiserror::Error;

/// Storage errors (internal; the [`ThresholdStore`] surface absorbs
/// them into defaults and warnings)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
