//! Alerting System
//!
//! Turns the detector's per-tick event stream into user-facing
//! alerts: per-kind cooldowns, per-minute throttling, and mapping of
//! the composite severity score to a coarse label.

mod manager;

pub use manager::{severity_label, AlertConfig, AlertKind, AlertManager, AlertState};
