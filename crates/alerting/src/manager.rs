//! Alert manager implementation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// User-facing alert kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Prolonged eye closure
    Drowsiness,

    /// Debounced yawn
    Yawn,

    /// Face absent beyond the face-lost window
    FaceLost,
}

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Cooldown between repeated alerts of the same kind (seconds)
    pub cooldown_seconds: u64,
    /// Maximum alerts per minute before throttling
    pub max_alerts_per_minute: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 5,
            max_alerts_per_minute: 20,
        }
    }
}

/// State of one alert kind
#[derive(Debug, Clone)]
pub struct AlertState {
    /// Last time this alert fired
    pub last_fired: Instant,
    /// Number of times fired
    pub fire_count: usize,
    /// Whether the alert has been acknowledged
    pub acknowledged: bool,
}

/// Deduplicates and throttles the detector's event stream.
///
/// The detector re-emits a continuing condition every frame; without
/// a cooldown a single long eye closure would produce an alert per
/// frame.
pub struct AlertManager {
    config: AlertConfig,
    states: HashMap<AlertKind, AlertState>,
    minute_count: usize,
    minute_start: Instant,
}

impl AlertManager {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            minute_count: 0,
            minute_start: Instant::now(),
        }
    }

    /// Whether an alert of this kind should fire now.
    pub fn should_fire(&mut self, kind: AlertKind) -> bool {
        if self.minute_start.elapsed() > Duration::from_secs(60) {
            self.minute_count = 0;
            self.minute_start = Instant::now();
        }

        if self.minute_count >= self.config.max_alerts_per_minute {
            warn!(?kind, "alert throttled, per-minute limit reached");
            return false;
        }

        if let Some(state) = self.states.get(&kind) {
            let cooldown = Duration::from_secs(self.config.cooldown_seconds);
            if state.last_fired.elapsed() < cooldown {
                debug!(?kind, "alert suppressed, in cooldown");
                return false;
            }
        }

        true
    }

    /// Record that an alert fired.
    pub fn record_fire(&mut self, kind: AlertKind) {
        self.minute_count += 1;

        let state = self.states.entry(kind).or_insert(AlertState {
            last_fired: Instant::now(),
            fire_count: 0,
            acknowledged: false,
        });
        state.last_fired = Instant::now();
        state.fire_count += 1;
        state.acknowledged = false;

        info!(?kind, count = state.fire_count, "alert fired");
    }

    /// Acknowledge an alert. Returns false if it never fired.
    pub fn acknowledge(&mut self, kind: AlertKind) -> bool {
        if let Some(state) = self.states.get_mut(&kind) {
            state.acknowledged = true;
            true
        } else {
            false
        }
    }

    /// Unacknowledged alerts
    pub fn pending(&self) -> Vec<(AlertKind, &AlertState)> {
        self.states
            .iter()
            .filter(|(_, state)| !state.acknowledged)
            .map(|(&kind, state)| (kind, state))
            .collect()
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.minute_count = 0;
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

/// Coarse severity label for a composite score in `[0, 100]`
pub fn severity_label(score: f32) -> &'static str {
    if score >= 80.0 {
        "critical"
    } else if score >= 60.0 {
        "high"
    } else if score >= 40.0 {
        "medium"
    } else {
        "low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_alert_fires() {
        let mut manager = AlertManager::default();
        assert!(manager.should_fire(AlertKind::Drowsiness));
    }

    #[test]
    fn test_cooldown_suppresses_duplicates() {
        let mut manager = AlertManager::default();

        assert!(manager.should_fire(AlertKind::Drowsiness));
        manager.record_fire(AlertKind::Drowsiness);
        assert!(!manager.should_fire(AlertKind::Drowsiness));

        // A different kind is unaffected
        assert!(manager.should_fire(AlertKind::Yawn));
    }

    #[test]
    fn test_minute_throttle() {
        let config = AlertConfig {
            cooldown_seconds: 0,
            max_alerts_per_minute: 3,
        };
        let mut manager = AlertManager::new(config);

        for _ in 0..3 {
            assert!(manager.should_fire(AlertKind::Yawn));
            manager.record_fire(AlertKind::Yawn);
        }
        assert!(!manager.should_fire(AlertKind::Yawn));
    }

    #[test]
    fn test_acknowledgement() {
        let mut manager = AlertManager::default();
        manager.record_fire(AlertKind::FaceLost);

        assert_eq!(manager.pending().len(), 1);
        assert!(manager.acknowledge(AlertKind::FaceLost));
        assert!(manager.pending().is_empty());
        assert!(!manager.acknowledge(AlertKind::Drowsiness));
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(severity_label(95.0), "critical");
        assert_eq!(severity_label(65.0), "high");
        assert_eq!(severity_label(45.0), "medium");
        assert_eq!(severity_label(10.0), "low");
    }
}
