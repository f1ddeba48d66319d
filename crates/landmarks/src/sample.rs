//! Point and sample types

use crate::index_map::LandmarkIndexMap;
use crate::LandmarkError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 2D point in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Eye and mouth keypoints for one face in one frame.
///
/// Eye points are in anatomical order: outer corner, two upper-lid
/// points, inner corner, two lower-lid points. Mouth points are top,
/// bottom, left corner, right corner.
///
/// A frame with no visible face has no sample at all (`None` at the
/// call sites), never a zero-filled one: zeroed points would satisfy
/// the closed-eye threshold and fake a drowsiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacialSample {
    pub left_eye: [Point2; 6],
    pub right_eye: [Point2; 6],
    pub mouth: [Point2; 4],
}

impl FacialSample {
    /// Build a sample from a backend's full point set using its index map.
    pub fn from_points(
        points: &[Point2],
        map: &LandmarkIndexMap,
    ) -> Result<FacialSample, LandmarkError> {
        let required = map.min_point_count();
        if points.len() < required {
            // Almost always a backend/map mismatch, e.g. a face-mesh
            // map configured against a 68-point predictor
            warn!(
                required,
                available = points.len(),
                "point set too small for index map"
            );
            return Err(LandmarkError::IndexOutOfRange {
                index: required - 1,
                count: points.len(),
            });
        }

        Ok(FacialSample {
            left_eye: pick(points, &map.left_eye)?,
            right_eye: pick(points, &map.right_eye)?,
            mouth: pick(points, &map.mouth)?,
        })
    }
}

fn pick<const N: usize>(
    points: &[Point2],
    indices: &[usize; N],
) -> Result<[Point2; N], LandmarkError> {
    let mut out = [Point2::default(); N];
    for (slot, &index) in out.iter_mut().zip(indices.iter()) {
        *slot = *points
            .get(index)
            .ok_or(LandmarkError::IndexOutOfRange {
                index,
                count: points.len(),
            })?;
    }
    Ok(out)
}
