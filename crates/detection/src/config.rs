//! Detection configuration

use serde::{Deserialize, Serialize};

/// Detection thresholds and debounce windows.
///
/// All values are explicit construction-time inputs; nothing is read
/// from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Eyes count as closed when EAR drops below this (calibration
    /// replaces it per user)
    pub ear_threshold: f32,

    /// Consecutive closed-eye frames before a drowsiness event
    pub ear_consec_frames: u32,

    /// Mouth counts as open when MAR rises above this
    pub mar_threshold: f32,

    /// Consecutive open-mouth frames before a yawn event
    pub yawn_consec_frames: u32,

    /// Consecutive face-absent frames before a face-lost event
    pub face_lost_frames: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            ear_consec_frames: 20,
            mar_threshold: 0.6,
            yawn_consec_frames: 15,
            face_lost_frames: 30,
        }
    }
}

impl DetectionConfig {
    /// Responsive profile for low-frame-rate edge devices (shorter
    /// debounce windows)
    pub fn strict() -> Self {
        Self {
            ear_consec_frames: 10,
            yawn_consec_frames: 8,
            face_lost_frames: 20,
            ..Default::default()
        }
    }

    /// Lenient profile (longer debounce windows, fewer false alarms)
    pub fn lenient() -> Self {
        Self {
            ear_consec_frames: 30,
            yawn_consec_frames: 20,
            face_lost_frames: 45,
            ..Default::default()
        }
    }
}
