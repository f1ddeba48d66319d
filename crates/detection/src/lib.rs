//! Drowsiness and Yawn Detection
//!
//! Per-frame signal pipeline turning facial landmark geometry into
//! debounced drowsy/yawn events:
//! - Eye and mouth aspect ratios (EAR/MAR)
//! - Consecutive-frame hysteresis gates with onset-edge events
//! - Composite 0-100 severity score
//!
//! The pipeline is synchronous and never fails: absent faces and
//! degenerate geometry are ordinary states, not errors.

pub mod config;
pub mod detector;
pub mod ratios;
pub mod score;
pub mod state;

pub use config::DetectionConfig;
pub use detector::{DetectionEvent, DetectionResult, DrowsinessDetector};
pub use ratios::{eye_aspect_ratio, mouth_aspect_ratio, ratios, RatioPair};
pub use score::severity_score;
pub use state::DetectorState;
