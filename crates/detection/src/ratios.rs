//! Eye and mouth aspect ratios

use landmarks::{FacialSample, Point2};
use serde::{Deserialize, Serialize};

/// EAR/MAR pair for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatioPair {
    /// Eye aspect ratio, lower means more closed (typically 0..0.5)
    pub ear: f32,
    /// Mouth aspect ratio, higher means more open (typically 0..1.0)
    pub mar: f32,
}

/// Eye aspect ratio for one eye.
///
/// Points in anatomical order `p0..p5`:
/// `(d(p1,p5) + d(p2,p4)) / (2 * d(p0,p3))`.
/// A zero horizontal distance yields 0.0 (treated as fully closed),
/// never a division error.
pub fn eye_aspect_ratio(eye: &[Point2; 6]) -> f32 {
    let vertical_a = eye[1].distance(&eye[5]);
    let vertical_b = eye[2].distance(&eye[4]);
    let horizontal = eye[0].distance(&eye[3]);

    if horizontal == 0.0 {
        return 0.0;
    }
    (vertical_a + vertical_b) / (2.0 * horizontal)
}

/// Mouth aspect ratio.
///
/// Points are top, bottom, left corner, right corner:
/// `d(top,bottom) / d(left,right)`, 0.0 when the corners coincide.
pub fn mouth_aspect_ratio(mouth: &[Point2; 4]) -> f32 {
    let vertical = mouth[0].distance(&mouth[1]);
    let horizontal = mouth[2].distance(&mouth[3]);

    if horizontal == 0.0 {
        return 0.0;
    }
    vertical / horizontal
}

/// Ratio pair for a frame: mean of both eye ratios plus the mouth ratio.
///
/// `None` (no face) yields `(0.0, 0.0)`. Callers must carry face
/// presence as its own flag; a zero ratio is never evidence of an
/// absent face, only of closed geometry.
pub fn ratios(sample: Option<&FacialSample>) -> RatioPair {
    let Some(sample) = sample else {
        return RatioPair::default();
    };

    let left = eye_aspect_ratio(&sample.left_eye);
    let right = eye_aspect_ratio(&sample.right_eye);

    RatioPair {
        ear: (left + right) / 2.0,
        mar: mouth_aspect_ratio(&sample.mouth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Eye with given vertical gaps and horizontal width
    fn eye(v1: f32, v2: f32, h: f32) -> [Point2; 6] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(h / 3.0, v1 / 2.0),
            Point2::new(2.0 * h / 3.0, v2 / 2.0),
            Point2::new(h, 0.0),
            Point2::new(2.0 * h / 3.0, -v2 / 2.0),
            Point2::new(h / 3.0, -v1 / 2.0),
        ]
    }

    fn mouth(v: f32, h: f32) -> [Point2; 4] {
        [
            Point2::new(h / 2.0, v / 2.0),
            Point2::new(h / 2.0, -v / 2.0),
            Point2::new(0.0, 0.0),
            Point2::new(h, 0.0),
        ]
    }

    #[test]
    fn test_open_eye_ratio() {
        // Verticals 10+10 over 2*30
        let ear = eye_aspect_ratio(&eye(10.0, 10.0, 30.0));
        assert!((ear - 10.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_eye_is_zero() {
        let collapsed = [Point2::new(5.0, 5.0); 6];
        assert_eq!(eye_aspect_ratio(&collapsed), 0.0);
    }

    #[test]
    fn test_degenerate_mouth_is_zero() {
        let collapsed = [Point2::new(1.0, 2.0); 4];
        assert_eq!(mouth_aspect_ratio(&collapsed), 0.0);
    }

    #[test]
    fn test_mouth_ratio() {
        let mar = mouth_aspect_ratio(&mouth(30.0, 50.0));
        assert!((mar - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_no_sample_yields_zero_pair() {
        assert_eq!(ratios(None), RatioPair::default());
    }

    #[test]
    fn test_overall_ear_is_mean_of_eyes() {
        let sample = FacialSample {
            left_eye: eye(10.0, 10.0, 30.0),
            right_eye: eye(20.0, 20.0, 30.0),
            mouth: mouth(10.0, 50.0),
        };
        let pair = ratios(Some(&sample));
        let expected = (10.0 / 30.0 + 20.0 / 30.0) / 2.0;
        assert!((pair.ear - expected).abs() < 1e-6);
    }

    proptest! {
        // EAR is monotonically non-decreasing in each vertical gap
        #[test]
        fn prop_ear_monotone_in_verticals(
            v1 in 0.0f32..50.0,
            v2 in 0.0f32..50.0,
            delta in 0.0f32..50.0,
        ) {
            let base = eye_aspect_ratio(&eye(v1, v2, 40.0));
            prop_assert!(eye_aspect_ratio(&eye(v1 + delta, v2, 40.0)) >= base);
            prop_assert!(eye_aspect_ratio(&eye(v1, v2 + delta, 40.0)) >= base);
        }

        #[test]
        fn prop_mar_monotone_in_vertical(
            v in 0.0f32..100.0,
            delta in 0.0f32..100.0,
        ) {
            let base = mouth_aspect_ratio(&mouth(v, 60.0));
            prop_assert!(mouth_aspect_ratio(&mouth(v + delta, 60.0)) >= base);
        }

        // Ratios are always finite and non-negative
        #[test]
        fn prop_ratios_finite(
            v1 in 0.0f32..100.0,
            v2 in 0.0f32..100.0,
            h in 0.0f32..100.0,
        ) {
            let ear = eye_aspect_ratio(&eye(v1, v2, h));
            prop_assert!(ear.is_finite());
            prop_assert!(ear >= 0.0);
        }
    }
}
