//! Threshold store implementations

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Fallback eye-closure threshold when nothing has been calibrated
pub const DEFAULT_EAR_THRESHOLD: f32 = 0.25;

/// Persisted calibration record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRecord {
    pub threshold: f32,
    pub saved_at: DateTime<Utc>,
}

/// Load/save capability for the calibrated threshold.
///
/// `load` never fails: missing or corrupt data is treated as absent
/// and yields the default. `save` never fails either; a persistence
/// problem is logged and the caller's in-memory value stays
/// authoritative.
pub trait ThresholdStore {
    /// Previously saved threshold, or the default.
    fn load(&self) -> f32;

    /// Persist a newly calibrated threshold.
    fn save(&self, threshold: f32);
}

/// JSON-file-backed store
pub struct FileThresholdStore {
    path: PathBuf,
    default: f32,
}

impl FileThresholdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default: DEFAULT_EAR_THRESHOLD,
        }
    }

    pub fn with_default(path: impl Into<PathBuf>, default: f32) -> Self {
        Self {
            path: path.into(),
            default,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<ThresholdRecord, StorageError> {
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_record(&self, record: &ThresholdRecord) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl ThresholdStore for FileThresholdStore {
    fn load(&self) -> f32 {
        match self.read_record() {
            Ok(record) => {
                info!(
                    threshold = record.threshold,
                    saved_at = %record.saved_at,
                    "loaded calibrated threshold"
                );
                record.threshold
            }
            Err(err) => {
                // Missing file on first run is the normal path
                debug!(path = %self.path.display(), %err, "no stored threshold, using default");
                self.default
            }
        }
    }

    fn save(&self, threshold: f32) {
        let record = ThresholdRecord {
            threshold,
            saved_at: Utc::now(),
        };
        match self.write_record(&record) {
            Ok(()) => info!(threshold, path = %self.path.display(), "threshold saved"),
            Err(err) => {
                warn!(
                    threshold,
                    path = %self.path.display(),
                    %err,
                    "failed to persist threshold, in-memory value remains active"
                );
            }
        }
    }
}

/// In-memory store for tests and ephemeral deployments
#[derive(Debug, Default)]
pub struct MemoryThresholdStore {
    value: Mutex<Option<f32>>,
}

impl MemoryThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            value: Mutex::new(Some(threshold)),
        }
    }
}

impl ThresholdStore for MemoryThresholdStore {
    fn load(&self) -> f32 {
        self.value
            .lock()
            .ok()
            .and_then(|v| *v)
            .unwrap_or(DEFAULT_EAR_THRESHOLD)
    }

    fn save(&self, threshold: f32) {
        if let Ok(mut value) = self.value.lock() {
            *value = Some(threshold);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThresholdStore::new(dir.path().join("calibration.json"));

        store.save(0.255);
        assert!((store.load() - 0.255).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThresholdStore::new(dir.path().join("absent.json"));

        assert_eq!(store.load(), DEFAULT_EAR_THRESHOLD);
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.json");
        std::fs::write(&path, "not json {").unwrap();

        let store = FileThresholdStore::new(&path);
        assert_eq!(store.load(), DEFAULT_EAR_THRESHOLD);
    }

    #[test]
    fn test_record_has_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.json");
        let store = FileThresholdStore::new(&path);

        store.save(0.3);
        let contents = std::fs::read_to_string(&path).unwrap();
        let record: ThresholdRecord = serde_json::from_str(&contents).unwrap();
        assert!((record.threshold - 0.3).abs() < 1e-6);
        assert!(record.saved_at <= Utc::now());
    }

    #[test]
    fn test_unwritable_path_keeps_running() {
        let store = FileThresholdStore::new("/nonexistent-dir/calibration.json");
        // Logged, not fatal
        store.save(0.3);
        assert_eq!(store.load(), DEFAULT_EAR_THRESHOLD);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryThresholdStore::new();
        assert_eq!(store.load(), DEFAULT_EAR_THRESHOLD);

        store.save(0.21);
        assert!((store.load() - 0.21).abs() < 1e-6);
    }
}
