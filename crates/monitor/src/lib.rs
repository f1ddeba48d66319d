//! Monitoring Session
//!
//! Wires the pipeline together for one camera stream: raw landmark
//! points in, classified detection results, alerts, and calibration
//! progress out. Owns the only mutable state in the system and must
//! be driven from a single thread, one tick per captured frame in
//! capture order.
//!
//! Results are published to other threads (dashboard, transport)
//! through [`SharedSnapshot`], a mutex-guarded copy of the latest
//! per-tick output; the session itself is never shared.

mod session;
mod snapshot;

pub use session::{MonitorConfig, MonitorSession, MonitorUpdate};
pub use snapshot::{SessionSnapshot, SessionStats, SharedSnapshot};
