//! Detection state machine
//!
//! Two parallel hysteresis gates (eyes, mouth) plus a face-presence
//! streak. Each gate requires N consecutive qualifying frames before
//! declaring its event, so single-frame noise never raises an alarm.

use crate::config::DetectionConfig;
use crate::ratios::RatioPair;
use crate::score::severity_score;
use crate::state::DetectorState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Classified outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionEvent {
    /// Eye-closure streak crossed the debounce window this tick
    DrowsyOnset,

    /// Drowsiness already declared, still below threshold
    DrowsyContinuing,

    /// Mouth-open streak crossed the debounce window this tick
    YawnOnset,

    /// Yawn already declared, still above threshold
    YawnContinuing,

    /// Face absent longer than the face-lost window
    FaceLost,
}

/// Per-tick detection output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub ear: f32,
    pub mar: f32,
    pub is_drowsy: bool,
    pub is_yawning: bool,
    pub face_detected: bool,
    /// Latched severity score (recomputed at onset edges)
    pub score: f32,
    pub events: Vec<DetectionEvent>,
}

/// Debounced drowsiness/yawn detector.
///
/// Consumes one `(ratios, face_detected)` pair per captured frame, in
/// capture order. Reordered delivery would corrupt the streak
/// counters; dropped frames are harmless.
pub struct DrowsinessDetector {
    config: DetectionConfig,
    state: DetectorState,
    latched_score: f32,
}

impl DrowsinessDetector {
    pub fn new(config: DetectionConfig) -> Self {
        let state = DetectorState::new(config.ear_threshold);
        Self {
            config,
            state,
            latched_score: 0.0,
        }
    }

    /// Process one frame's signals.
    pub fn tick(&mut self, ratios: RatioPair, face_detected: bool) -> DetectionResult {
        let mut events = Vec::new();

        if face_detected {
            self.state.face_absent_streak = 0;
            self.update_eye_gate(ratios, &mut events);
            self.update_mouth_gate(ratios, &mut events);
        } else {
            // Gates freeze while the face is absent: a brief tracking
            // dropout must not erase progress toward an alert, and a
            // zero-filled ratio must not advance it either.
            self.state.face_absent_streak += 1;
            if self.state.face_absent_streak > self.config.face_lost_frames {
                events.push(DetectionEvent::FaceLost);
            }
        }

        DetectionResult {
            ear: ratios.ear,
            mar: ratios.mar,
            is_drowsy: self.state.eye_closed_streak >= self.config.ear_consec_frames,
            is_yawning: self.state.mouth_open_streak >= self.config.yawn_consec_frames,
            face_detected,
            score: self.latched_score,
            events,
        }
    }

    fn update_eye_gate(&mut self, ratios: RatioPair, events: &mut Vec<DetectionEvent>) {
        if ratios.ear < self.state.eye_threshold {
            self.state.eye_closed_streak += 1;
            if self.state.eye_closed_streak == self.config.ear_consec_frames {
                self.state.total_drowsy_events += 1;
                self.relatch_score(ratios);
                info!(
                    ear = ratios.ear,
                    event = self.state.total_drowsy_events,
                    "drowsiness onset"
                );
                events.push(DetectionEvent::DrowsyOnset);
            } else if self.state.eye_closed_streak > self.config.ear_consec_frames {
                events.push(DetectionEvent::DrowsyContinuing);
            }
        } else {
            if self.state.eye_closed_streak > 0 {
                debug!(streak = self.state.eye_closed_streak, "eye streak reset");
            }
            self.state.eye_closed_streak = 0;
        }
    }

    fn update_mouth_gate(&mut self, ratios: RatioPair, events: &mut Vec<DetectionEvent>) {
        if ratios.mar > self.config.mar_threshold {
            self.state.mouth_open_streak += 1;
            if self.state.mouth_open_streak == self.config.yawn_consec_frames {
                self.state.total_yawn_events += 1;
                self.relatch_score(ratios);
                info!(
                    mar = ratios.mar,
                    event = self.state.total_yawn_events,
                    "yawn onset"
                );
                events.push(DetectionEvent::YawnOnset);
            } else if self.state.mouth_open_streak > self.config.yawn_consec_frames {
                events.push(DetectionEvent::YawnContinuing);
            }
        } else {
            self.state.mouth_open_streak = 0;
        }
    }

    /// Score is recomputed when an episode begins and held between
    /// episodes, so the UI sees a stable number rather than a value
    /// that flickers frame to frame.
    fn relatch_score(&mut self, ratios: RatioPair) {
        self.latched_score = severity_score(&ratios, &self.state, &self.config);
    }

    /// Replace the eye-closure threshold (calibration result or a
    /// value loaded from the store).
    pub fn set_eye_threshold(&mut self, threshold: f32) {
        info!(threshold, "eye threshold updated");
        self.state.eye_threshold = threshold;
    }

    pub fn eye_threshold(&self) -> f32 {
        self.state.eye_threshold
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Reset gate streaks on session restart. Event totals and the
    /// calibrated threshold survive.
    pub fn reset(&mut self) {
        self.state.reset_streaks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed() -> RatioPair {
        RatioPair { ear: 0.1, mar: 0.0 }
    }

    fn open() -> RatioPair {
        RatioPair { ear: 0.35, mar: 0.0 }
    }

    fn yawning() -> RatioPair {
        RatioPair { ear: 0.35, mar: 0.8 }
    }

    #[test]
    fn test_drowsy_fires_exactly_at_debounce_window() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for tick in 1..20 {
            let result = detector.tick(closed(), true);
            assert!(!result.is_drowsy, "tick {tick} should not be drowsy");
            assert_eq!(detector.state().total_drowsy_events, 0);
        }

        let result = detector.tick(closed(), true);
        assert!(result.is_drowsy);
        assert_eq!(result.events, vec![DetectionEvent::DrowsyOnset]);
        assert_eq!(detector.state().total_drowsy_events, 1);
    }

    #[test]
    fn test_continuing_does_not_recount() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for _ in 0..20 {
            detector.tick(closed(), true);
        }
        for _ in 0..10 {
            let result = detector.tick(closed(), true);
            assert!(result.is_drowsy);
            assert_eq!(result.events, vec![DetectionEvent::DrowsyContinuing]);
        }

        assert_eq!(detector.state().total_drowsy_events, 1);
    }

    #[test]
    fn test_one_open_frame_resets_streak() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for _ in 0..19 {
            detector.tick(closed(), true);
        }
        detector.tick(open(), true);
        assert_eq!(detector.state().eye_closed_streak, 0);

        // Streak starts over: 19 more closed frames still no event
        for _ in 0..19 {
            let result = detector.tick(closed(), true);
            assert!(!result.is_drowsy);
        }
        assert_eq!(detector.state().total_drowsy_events, 0);
    }

    #[test]
    fn test_absence_freezes_eye_streak() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for _ in 0..15 {
            detector.tick(closed(), true);
        }
        // Tracking dropout: no increment, no reset
        for _ in 0..5 {
            detector.tick(RatioPair::default(), false);
        }
        assert_eq!(detector.state().eye_closed_streak, 15);

        for _ in 0..4 {
            detector.tick(closed(), true);
        }
        assert_eq!(detector.state().total_drowsy_events, 0);
        let result = detector.tick(closed(), true);
        assert!(result.is_drowsy);
        assert_eq!(detector.state().total_drowsy_events, 1);
    }

    #[test]
    fn test_yawn_gate_is_independent() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for tick in 1..15 {
            let result = detector.tick(yawning(), true);
            assert!(!result.is_yawning, "tick {tick} should not be yawning");
        }
        let result = detector.tick(yawning(), true);
        assert!(result.is_yawning);
        assert!(!result.is_drowsy);
        assert_eq!(result.events, vec![DetectionEvent::YawnOnset]);
        assert_eq!(detector.state().total_yawn_events, 1);
        assert_eq!(detector.state().total_drowsy_events, 0);
    }

    #[test]
    fn test_face_lost_after_window() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for _ in 0..30 {
            let result = detector.tick(RatioPair::default(), false);
            assert!(result.events.is_empty());
        }
        let result = detector.tick(RatioPair::default(), false);
        assert_eq!(result.events, vec![DetectionEvent::FaceLost]);

        // Face lost never counts as drowsiness
        assert_eq!(detector.state().total_drowsy_events, 0);
        assert_eq!(detector.state().total_yawn_events, 0);
    }

    #[test]
    fn test_face_return_resets_absence_streak() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for _ in 0..25 {
            detector.tick(RatioPair::default(), false);
        }
        detector.tick(open(), true);
        assert_eq!(detector.state().face_absent_streak, 0);
    }

    #[test]
    fn test_score_latches_at_onset() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());

        for tick in 1..20 {
            let result = detector.tick(closed(), true);
            assert_eq!(result.score, 0.0, "tick {tick} before onset");
        }
        let onset = detector.tick(closed(), true);
        assert!(onset.score > 0.0);

        // Held after recovery
        let recovered = detector.tick(open(), true);
        assert_eq!(recovered.score, onset.score);
    }

    #[test]
    fn test_reset_clears_streaks_only() {
        let mut detector = DrowsinessDetector::new(DetectionConfig::default());
        for _ in 0..25 {
            detector.tick(closed(), true);
        }
        detector.reset();

        assert_eq!(detector.state().eye_closed_streak, 0);
        assert_eq!(detector.state().total_drowsy_events, 1);
    }
}
