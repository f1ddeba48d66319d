//! Composite severity scoring
//!
//! Blends "how far past threshold" with "how long past threshold"
//! into a single 0-100 score for UI ranking and triage, weighted
//! toward the eyes. The duration terms use the session's lifetime
//! event totals, so the score ratchets up over a session rather than
//! tracking only the current episode; that matches the deployed
//! behavior and is kept deliberately.

use crate::config::DetectionConfig;
use crate::ratios::RatioPair;
use crate::state::DetectorState;

const EYE_WEIGHT: f32 = 0.8;
const MOUTH_WEIGHT: f32 = 0.2;

/// Severity score in `[0, 100]`. Reads counters, mutates nothing.
pub fn severity_score(
    ratios: &RatioPair,
    state: &DetectorState,
    config: &DetectionConfig,
) -> f32 {
    let eye_value = if state.eye_threshold > 0.0 {
        clamp01((state.eye_threshold - ratios.ear) / state.eye_threshold) * 100.0
    } else {
        0.0
    };
    let eye_duration = duration_score(state.total_drowsy_events, config.ear_consec_frames);
    let eye_score = 0.5 * eye_value + 0.5 * eye_duration;

    let mar_span = 1.0 - config.mar_threshold;
    let mouth_value = if mar_span > 0.0 {
        clamp01((ratios.mar - config.mar_threshold) / mar_span) * 100.0
    } else {
        0.0
    };
    let mouth_duration = duration_score(state.total_yawn_events, config.yawn_consec_frames);
    let mouth_score = 0.5 * mouth_value + 0.5 * mouth_duration;

    EYE_WEIGHT * eye_score + MOUTH_WEIGHT * mouth_score
}

fn duration_score(events: u64, consec_frames: u32) -> f32 {
    if consec_frames == 0 {
        return 0.0;
    }
    (events as f32 / consec_frames as f32 * 100.0).clamp(0.0, 100.0)
}

fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
