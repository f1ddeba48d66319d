//! Facial Landmark Types
//!
//! Normalizes the output of external landmark backends into the fixed
//! set of eye and mouth points the detection pipeline consumes:
//! - 2D point and sample types
//! - Index maps for the supported backend point schemes
//! - The `LandmarkExtractor` capability trait

pub mod index_map;
pub mod sample;

pub use index_map::LandmarkIndexMap;
pub use sample::{FacialSample, Point2};

use thiserror::Error;

/// Landmark error types
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Landmark index {index} out of range ({count} points available)")]
    IndexOutOfRange { index: usize, count: usize },
}

/// External landmark backend, chosen once at startup.
///
/// Given a frame, returns every facial keypoint in frame pixel
/// coordinates, or `None` when no face is visible. The associated
/// `Frame` type keeps this crate independent of any image library;
/// the capture layer supplies whatever frame type its backend needs.
pub trait LandmarkExtractor {
    type Frame;

    /// Detect facial landmarks in a frame. `None` means no face.
    fn detect_landmarks(&mut self, frame: &Self::Frame) -> Option<Vec<Point2>>;

    /// Index map describing how this backend's point scheme maps onto
    /// the eye and mouth points used for EAR/MAR.
    fn index_map(&self) -> &LandmarkIndexMap;
}
