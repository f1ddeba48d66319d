//! Backend point-scheme index maps
//!
//! The two deployed backends use incompatible numbering: a 68-point
//! shape predictor and a dense face mesh (~468 points). The map is
//! supplied at construction so the detection pipeline never branches
//! on which backend produced the points.

use serde::{Deserialize, Serialize};

/// Indices of the EAR/MAR keypoints within a backend's point set.
///
/// Eye entries follow the anatomical order documented on
/// [`crate::FacialSample`]; mouth entries are top, bottom, left
/// corner, right corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkIndexMap {
    pub left_eye: [usize; 6],
    pub right_eye: [usize; 6],
    pub mouth: [usize; 4],
}

impl LandmarkIndexMap {
    /// Map for 68-point shape-predictor backends.
    ///
    /// Mouth uses the inner-lip points so lip thickness does not
    /// inflate the open-mouth ratio.
    pub fn predictor_68() -> Self {
        Self {
            left_eye: [42, 43, 44, 45, 46, 47],
            right_eye: [36, 37, 38, 39, 40, 41],
            mouth: [62, 66, 60, 64],
        }
    }

    /// Map for dense face-mesh backends (468-point scheme).
    pub fn face_mesh() -> Self {
        Self {
            left_eye: [33, 160, 158, 133, 153, 144],
            right_eye: [362, 385, 387, 263, 373, 380],
            mouth: [13, 14, 61, 291],
        }
    }

    /// Smallest point count a backend must produce for this map.
    pub fn min_point_count(&self) -> usize {
        let eyes = self.left_eye.iter().chain(self.right_eye.iter());
        eyes.chain(self.mouth.iter()).max().map_or(0, |&i| i + 1)
    }
}
