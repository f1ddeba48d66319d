//! Detector state tracking

use serde::{Deserialize, Serialize};

/// Mutable state owned by the detection state machine for the
/// lifetime of one monitoring session.
///
/// Only `eye_threshold` is ever persisted (through the threshold
/// store); everything else lives and dies with the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorState {
    /// Consecutive frames with EAR below threshold
    pub eye_closed_streak: u32,

    /// Consecutive frames with MAR above threshold
    pub mouth_open_streak: u32,

    /// Consecutive frames with no face sample
    pub face_absent_streak: u32,

    /// Active eye-closure threshold (default or calibrated)
    pub eye_threshold: f32,

    /// Debounced drowsiness events this session (one per onset)
    pub total_drowsy_events: u64,

    /// Debounced yawn events this session (one per onset)
    pub total_yawn_events: u64,
}

impl DetectorState {
    pub fn new(eye_threshold: f32) -> Self {
        Self {
            eye_closed_streak: 0,
            mouth_open_streak: 0,
            face_absent_streak: 0,
            eye_threshold,
            total_drowsy_events: 0,
            total_yawn_events: 0,
        }
    }

    /// Reset the gate streaks on session restart. Event totals and
    /// the threshold survive.
    pub fn reset_streaks(&mut self) {
        self.eye_closed_streak = 0;
        self.mouth_open_streak = 0;
        self.face_absent_streak = 0;
    }
}

impl Default for DetectorState {
    fn default() -> Self {
        Self::new(crate::config::DetectionConfig::default().ear_threshold)
    }
}
