//! Cross-thread result publication

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Session-level counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub frames_processed: u64,
    pub total_drowsy_events: u64,
    pub total_yawn_events: u64,
}

/// Latest per-tick output, flattened for a presentation layer.
///
/// Plain values only; how they are rendered is not this crate's
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub ear: f32,
    pub mar: f32,
    pub is_drowsy: bool,
    pub is_yawning: bool,
    pub face_detected: bool,
    pub score: f32,
    pub severity: String,
    pub stats: SessionStats,
    pub calibrating: bool,
    pub calibration_remaining_secs: u32,
    pub calibration_message: String,
}

/// Mutex-guarded snapshot for handoff to dashboard or transport
/// threads. Cloning shares the underlying slot.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<SessionSnapshot>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot (called by the frame-loop thread).
    pub fn publish(&self, snapshot: SessionSnapshot) {
        let mut slot = match self.inner.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = snapshot;
    }

    /// Copy of the latest snapshot (called by consumer threads).
    pub fn get(&self) -> SessionSnapshot {
        match self.inner.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
