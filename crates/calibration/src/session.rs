//! Calibration session state machine

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Calibration tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Warm-up before sampling starts, giving the user time to
    /// position in front of the camera (seconds)
    pub countdown_secs: u32,

    /// Sampling window (seconds of wall-clock time)
    pub duration_secs: u32,

    /// Threshold = mean observed EAR times this margin; alert fires
    /// when the eyes drop to this fraction of their relaxed openness
    pub safety_margin: f32,

    /// Sanity floor: samples at or below this EAR are spurious
    /// near-zero readings, not relaxed open eyes
    pub min_valid_ear: f32,

    /// Face absence longer than this discards the collected samples
    /// and restarts the window (milliseconds)
    pub face_loss_grace_ms: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            duration_secs: 10,
            safety_margin: 0.85,
            min_valid_ear: 0.1,
            face_loss_grace_ms: 500,
        }
    }
}

/// Progress surface for a dashboard or CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    pub remaining_secs: u32,
    pub sample_count: usize,
    pub running_average_ear: f32,
    pub message: String,
}

/// Terminal result of a calibration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalibrationOutcome {
    /// Sampling succeeded; the new threshold should be persisted and
    /// applied to the detector
    Calibrated {
        threshold: f32,
        average_ear: f32,
        sample_count: usize,
    },

    /// No usable samples in the window; the previous threshold stays
    /// active. An expected outcome, not an error.
    Skipped,

    /// Caller requested cancellation
    Cancelled,
}

/// Result of feeding one tick to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalibrationStep {
    Countdown(CalibrationProgress),
    Sampling(CalibrationProgress),
    Finished(CalibrationOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Countdown,
    Sampling,
}

/// One calibration run.
///
/// Ephemeral: created when calibration is triggered, dropped once
/// [`CalibrationStep::Finished`] is returned. Normal detection output
/// is not meaningful while a session is running, since the face is
/// being observed for a different purpose.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    config: CalibrationConfig,
    phase: Phase,
    phase_started_ms: u64,
    samples: Vec<f32>,
    last_face_seen_ms: u64,
    cancel_requested: bool,
    outcome: Option<CalibrationOutcome>,
}

impl CalibrationSession {
    pub fn new(config: CalibrationConfig, now_ms: u64) -> Self {
        info!(
            countdown_secs = config.countdown_secs,
            duration_secs = config.duration_secs,
            "calibration started"
        );
        Self {
            config,
            phase: Phase::Countdown,
            phase_started_ms: now_ms,
            samples: Vec::new(),
            last_face_seen_ms: now_ms,
            cancel_requested: false,
            outcome: None,
        }
    }

    /// Request cancellation; honored at the next [`Self::update`].
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Terminal outcome, once the session has finished.
    pub fn outcome(&self) -> Option<&CalibrationOutcome> {
        self.outcome.as_ref()
    }

    /// Feed one frame's signals. `now_ms` is the frame capture time
    /// in milliseconds on any monotonic clock.
    pub fn update(&mut self, ear: f32, face_detected: bool, now_ms: u64) -> CalibrationStep {
        if let Some(outcome) = &self.outcome {
            return CalibrationStep::Finished(outcome.clone());
        }
        if self.cancel_requested {
            info!("calibration cancelled");
            return self.finish(CalibrationOutcome::Cancelled);
        }

        if self.phase == Phase::Countdown {
            let elapsed_ms = now_ms.saturating_sub(self.phase_started_ms);
            if elapsed_ms < u64::from(self.config.countdown_secs) * 1000 {
                let remaining = self
                    .config
                    .countdown_secs
                    .saturating_sub((elapsed_ms / 1000) as u32);
                return CalibrationStep::Countdown(self.progress(
                    remaining,
                    format!("Starting in {remaining}s - position yourself..."),
                ));
            }
            self.phase = Phase::Sampling;
            self.phase_started_ms = now_ms;
            self.last_face_seen_ms = now_ms;
            self.samples.clear();
        }

        let elapsed_ms = now_ms.saturating_sub(self.phase_started_ms);
        if elapsed_ms >= u64::from(self.config.duration_secs) * 1000 {
            return self.complete_window();
        }

        let remaining = self
            .config
            .duration_secs
            .saturating_sub((elapsed_ms / 1000) as u32);

        if face_detected && ear > self.config.min_valid_ear {
            self.samples.push(ear);
            self.last_face_seen_ms = now_ms;
            let count = self.samples.len();
            CalibrationStep::Sampling(self.progress(
                remaining,
                format!("Calibrating... {remaining}s | Samples: {count}"),
            ))
        } else {
            let absent_ms = now_ms.saturating_sub(self.last_face_seen_ms);
            if absent_ms > self.config.face_loss_grace_ms && !self.samples.is_empty() {
                // Calibration is only trustworthy on a continuously
                // visible face: discard everything and start the
                // window over.
                warn!(discarded = self.samples.len(), "face lost, restarting calibration");
                self.samples.clear();
                self.phase_started_ms = now_ms;
            }
            CalibrationStep::Sampling(
                self.progress(remaining, format!("Face not detected! {remaining}s")),
            )
        }
    }

    fn complete_window(&mut self) -> CalibrationStep {
        if self.samples.is_empty() {
            warn!("calibration window elapsed with no samples, keeping previous threshold");
            return self.finish(CalibrationOutcome::Skipped);
        }

        let average_ear = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        let threshold = average_ear * self.config.safety_margin;
        info!(
            average_ear,
            threshold,
            samples = self.samples.len(),
            "calibration complete"
        );
        self.finish(CalibrationOutcome::Calibrated {
            threshold,
            average_ear,
            sample_count: self.samples.len(),
        })
    }

    fn finish(&mut self, outcome: CalibrationOutcome) -> CalibrationStep {
        self.outcome = Some(outcome.clone());
        CalibrationStep::Finished(outcome)
    }

    fn progress(&self, remaining_secs: u32, message: String) -> CalibrationProgress {
        let running_average_ear = if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f32>() / self.samples.len() as f32
        };
        CalibrationProgress {
            remaining_secs,
            sample_count: self.samples.len(),
            running_average_ear,
            message,
        }
    }
}
