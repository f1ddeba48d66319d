//! Session orchestration

use crate::snapshot::{SessionSnapshot, SessionStats};
use alerting::{severity_label, AlertConfig, AlertKind, AlertManager};
use calibration::{CalibrationConfig, CalibrationOutcome, CalibrationSession, CalibrationStep};
use detection::{ratios, DetectionConfig, DetectionEvent, DetectionResult, DrowsinessDetector};
use landmarks::{FacialSample, LandmarkIndexMap, Point2};
use serde::{Deserialize, Serialize};
use storage::ThresholdStore;
use tracing::{info, warn};

/// Combined configuration for one monitoring session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub detection: DetectionConfig,
    pub calibration: CalibrationConfig,
    pub alerts: AlertConfig,
}

/// Outcome of one tick
#[derive(Debug, Clone)]
pub enum MonitorUpdate {
    /// Normal detection tick, with any alerts that passed the
    /// deduplication gate
    Detection {
        result: DetectionResult,
        alerts: Vec<AlertKind>,
    },

    /// Calibration is running (or just finished); detection output is
    /// suspended for the duration
    Calibration(CalibrationStep),
}

/// One monitoring session for one camera stream.
///
/// Owned by the frame-loop thread; feed [`Self::tick`] the extractor
/// output for each frame, in capture order. `now_ms` is the frame
/// capture time on any monotonic millisecond clock and only drives
/// the wall-clock calibration window.
pub struct MonitorSession<S: ThresholdStore> {
    index_map: LandmarkIndexMap,
    detector: DrowsinessDetector,
    alerts: AlertManager,
    store: S,
    config: MonitorConfig,
    calibration: Option<CalibrationSession>,
    frames_processed: u64,
    snapshot: SessionSnapshot,
}

impl<S: ThresholdStore> MonitorSession<S> {
    /// Create a session, loading any previously calibrated threshold
    /// from the store.
    pub fn new(config: MonitorConfig, index_map: LandmarkIndexMap, store: S) -> Self {
        let mut detector = DrowsinessDetector::new(config.detection.clone());
        detector.set_eye_threshold(store.load());
        info!(eye_threshold = detector.eye_threshold(), "monitoring session created");

        Self {
            index_map,
            detector,
            alerts: AlertManager::new(config.alerts.clone()),
            store,
            config,
            calibration: None,
            frames_processed: 0,
            snapshot: SessionSnapshot::default(),
        }
    }

    /// Process one frame's landmark extraction output.
    pub fn tick(&mut self, points: Option<&[Point2]>, now_ms: u64) -> MonitorUpdate {
        self.frames_processed += 1;

        let sample = points.and_then(|points| {
            match FacialSample::from_points(points, &self.index_map) {
                Ok(sample) => Some(sample),
                Err(err) => {
                    // Wrong index map for this backend; treat the
                    // face as unusable rather than feeding garbage
                    // geometry downstream.
                    warn!(%err, "landmark set unusable for configured index map");
                    None
                }
            }
        });
        let face_detected = sample.is_some();
        let pair = ratios(sample.as_ref());

        if let Some(session) = self.calibration.take() {
            return self.tick_calibration(session, pair.ear, face_detected, now_ms);
        }

        let result = self.detector.tick(pair, face_detected);
        let fired = self.route_alerts(&result.events);
        self.refresh_snapshot(&result);
        MonitorUpdate::Detection {
            result,
            alerts: fired,
        }
    }

    fn tick_calibration(
        &mut self,
        mut session: CalibrationSession,
        ear: f32,
        face_detected: bool,
        now_ms: u64,
    ) -> MonitorUpdate {
        let step = session.update(ear, face_detected, now_ms);

        match &step {
            CalibrationStep::Finished(outcome) => {
                if let CalibrationOutcome::Calibrated { threshold, .. } = outcome {
                    self.store.save(*threshold);
                    self.detector.set_eye_threshold(*threshold);
                }
                self.snapshot.calibrating = false;
                self.snapshot.calibration_message = match outcome {
                    CalibrationOutcome::Calibrated { threshold, .. } => {
                        format!("Calibration complete (threshold: {threshold:.3})")
                    }
                    CalibrationOutcome::Skipped => {
                        "Calibration skipped - no face detected".to_string()
                    }
                    CalibrationOutcome::Cancelled => "Calibration cancelled".to_string(),
                };
            }
            CalibrationStep::Countdown(progress) | CalibrationStep::Sampling(progress) => {
                self.snapshot.calibrating = true;
                self.snapshot.calibration_remaining_secs = progress.remaining_secs;
                self.snapshot.calibration_message = progress.message.clone();
                self.calibration = Some(session);
            }
        }

        MonitorUpdate::Calibration(step)
    }

    fn route_alerts(&mut self, events: &[DetectionEvent]) -> Vec<AlertKind> {
        let mut fired = Vec::new();
        for event in events {
            let kind = match event {
                DetectionEvent::DrowsyOnset | DetectionEvent::DrowsyContinuing => {
                    AlertKind::Drowsiness
                }
                DetectionEvent::YawnOnset | DetectionEvent::YawnContinuing => AlertKind::Yawn,
                DetectionEvent::FaceLost => AlertKind::FaceLost,
            };
            if self.alerts.should_fire(kind) {
                self.alerts.record_fire(kind);
                fired.push(kind);
            }
        }
        fired
    }

    fn refresh_snapshot(&mut self, result: &DetectionResult) {
        // The last outcome message stays published until the next
        // session starts, so a slow-polling consumer still sees it
        let calibration_message = std::mem::take(&mut self.snapshot.calibration_message);
        self.snapshot = SessionSnapshot {
            ear: result.ear,
            mar: result.mar,
            is_drowsy: result.is_drowsy,
            is_yawning: result.is_yawning,
            face_detected: result.face_detected,
            score: result.score,
            severity: severity_label(result.score).to_string(),
            stats: self.stats(),
            calibrating: false,
            calibration_remaining_secs: 0,
            calibration_message,
        };
    }

    /// Begin (or restart) calibration. Detection is suspended until
    /// the session finishes.
    pub fn start_calibration(&mut self, now_ms: u64) {
        self.calibration = Some(CalibrationSession::new(
            self.config.calibration.clone(),
            now_ms,
        ));
    }

    /// Request cancellation of a running calibration; honored on the
    /// next tick.
    pub fn cancel_calibration(&mut self) {
        if let Some(session) = self.calibration.as_mut() {
            session.cancel();
        }
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_some()
    }

    /// Active eye-closure threshold (default, loaded, or calibrated).
    pub fn eye_threshold(&self) -> f32 {
        self.detector.eye_threshold()
    }

    /// Session-level counters.
    pub fn stats(&self) -> SessionStats {
        let state = self.detector.state();
        SessionStats {
            frames_processed: self.frames_processed,
            total_drowsy_events: state.total_drowsy_events,
            total_yawn_events: state.total_yawn_events,
        }
    }

    /// Latest flattened output for publication.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.clone()
    }

    /// Reset gate streaks for a session restart (camera reconnect).
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
