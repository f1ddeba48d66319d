//! EAR Threshold Calibration
//!
//! Time-boxed sampling of a user's natural open-eye ratio. Default
//! eye-closure thresholds vary across eye shapes and camera setups;
//! a short observation window produces a personalized threshold at a
//! safety margin below the observed relaxed value.
//!
//! The session is driven by the same per-tick call pattern as
//! detection: the caller feeds it one `(ear, face_detected,
//! timestamp)` triple per captured frame. Time is measured from the
//! caller-supplied timestamps, so the window is wall-clock accurate
//! regardless of frame rate.

mod session;

pub use session::{
    CalibrationConfig, CalibrationOutcome, CalibrationProgress, CalibrationSession,
    CalibrationStep,
};
