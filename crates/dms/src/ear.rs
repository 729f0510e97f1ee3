//! Eye aspect ratio (EAR) estimation

use serde::{Deserialize, Serialize};
use crate::DmsError;

/// Horizontal corner distances below this are treated as a collapsed contour
const MIN_HORIZONTAL_DISTANCE: f64 = 1e-9;

/// 2D landmark coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Six-point eye contour.
///
/// Points 0 and 3 are the horizontal corners, (1, 5) and (2, 4) the
/// upper/lower lid pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyePoints(pub [Point; 6]);

impl EyePoints {
    pub fn new(points: [Point; 6]) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point; 6] {
        &self.0
    }

    /// Apply `f` to every point
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self(self.0.map(f))
    }
}

impl TryFrom<&[Point]> for EyePoints {
    type Error = DmsError;

    fn try_from(points: &[Point]) -> Result<Self, Self::Error> {
        let points: [Point; 6] = points
            .try_into()
            .map_err(|_| DmsError::InvalidEyePoints(points.len()))?;
        Ok(Self(points))
    }
}

/// Compute the eye aspect ratio of a single eye.
///
/// `EAR = (|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)`
///
/// Returns [`DmsError::DegenerateGeometry`] instead of an infinite or NaN
/// ratio when the corner points (nearly) coincide, or when the summed lid
/// distances are not finite. The error carries both the corner distance and
/// the summed lid distance.
pub fn compute_ear(eye: &EyePoints) -> Result<f64, DmsError> {
    let p = eye.points();

    let vertical = p[1].distance(&p[5]) + p[2].distance(&p[4]);
    let horizontal = p[0].distance(&p[3]);
    let degenerate = DmsError::DegenerateGeometry { horizontal, vertical };

    if horizontal.is_nan() || horizontal < MIN_HORIZONTAL_DISTANCE || !vertical.is_finite() {
        return Err(degenerate);
    }

    let ear = vertical / (2.0 * horizontal);
    if !ear.is_finite() {
        return Err(degenerate);
    }

    Ok(ear)
}

/// Mean EAR over both eyes
pub fn average_ear(left: &EyePoints, right: &EyePoints) -> Result<f64, DmsError> {
    Ok((compute_ear(left)? + compute_ear(right)?) / 2.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Eye of the given width whose lid pairs are `opening` apart
    pub(crate) fn eye(width: f64, opening: f64) -> EyePoints {
        let half = opening / 2.0;
        EyePoints::new([
            Point::new(0.0, 0.0),
            Point::new(width / 3.0, -half),
            Point::new(2.0 * width / 3.0, -half),
            Point::new(width, 0.0),
            Point::new(2.0 * width / 3.0, half),
            Point::new(width / 3.0, half),
        ])
    }

    #[test]
    fn test_symmetric_eye_ratio() {
        // Lid gaps equal to the corner width
        let ear = compute_ear(&eye(10.0, 10.0)).unwrap();
        assert!((ear - 1.0).abs() < 1e-12);

        // Lid gaps of half the width
        let ear = compute_ear(&eye(10.0, 5.0)).unwrap();
        assert!((ear - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_known_contour() {
        let eye = EyePoints::new([
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, -1.0),
            Point::new(1.0, -1.0),
        ]);
        // A = 2, B = 2, C = 4
        assert!((compute_ear(&eye).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_closed_eye_is_zero() {
        let ear = compute_ear(&eye(30.0, 0.0)).unwrap();
        assert_eq!(ear, 0.0);
    }

    #[test]
    fn test_degenerate_contour() {
        let mut points = *eye(10.0, 3.0).points();
        points[3] = points[0];
        let result = compute_ear(&EyePoints::new(points));
        assert!(matches!(result, Err(DmsError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_overflowing_lids_report_vertical_distance() {
        let mut points = *eye(4.0, 3.0).points();
        points[1].y = -1e308;
        points[5].y = 1e308;
        match compute_ear(&EyePoints::new(points)) {
            Err(DmsError::DegenerateGeometry { horizontal, vertical }) => {
                assert_eq!(horizontal, 4.0);
                assert!(!vertical.is_finite());
            }
            other => panic!("expected degenerate geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_collapsed_corners_report_horizontal_distance() {
        let mut points = *eye(10.0, 3.0).points();
        points[3] = points[0];
        match compute_ear(&EyePoints::new(points)) {
            Err(DmsError::DegenerateGeometry { horizontal, vertical }) => {
                assert_eq!(horizontal, 0.0);
                assert!((vertical - 6.0).abs() < 1e-12);
            }
            other => panic!("expected degenerate geometry, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_coordinates_are_degenerate() {
        let mut points = *eye(10.0, 3.0).points();
        points[0] = Point::new(f64::NAN, 0.0);
        let result = compute_ear(&EyePoints::new(points));
        assert!(matches!(result, Err(DmsError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_average_of_both_eyes() {
        let ear = average_ear(&eye(10.0, 2.0), &eye(10.0, 4.0)).unwrap();
        assert!((ear - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_try_from_slice() {
        let points = vec![Point::default(); 5];
        let result = EyePoints::try_from(points.as_slice());
        assert!(matches!(result, Err(DmsError::InvalidEyePoints(5))));

        let points = eye(10.0, 3.0).points().to_vec();
        assert!(EyePoints::try_from(points.as_slice()).is_ok());
    }

    proptest! {
        #[test]
        fn ear_is_translation_invariant(
            width in 1.0f64..100.0,
            opening in 0.0f64..50.0,
            dx in -1000.0f64..1000.0,
            dy in -1000.0f64..1000.0,
        ) {
            let base = eye(width, opening);
            let moved = base.map(|p| Point::new(p.x + dx, p.y + dy));
            let a = compute_ear(&base).unwrap();
            let b = compute_ear(&moved).unwrap();
            prop_assert!((a - b).abs() < 1e-6);
        }

        #[test]
        fn ear_is_scale_invariant(
            width in 1.0f64..100.0,
            opening in 0.0f64..50.0,
            k in 0.01f64..100.0,
        ) {
            let base = eye(width, opening);
            let scaled = base.map(|p| Point::new(p.x * k, p.y * k));
            let a = compute_ear(&base).unwrap();
            let b = compute_ear(&scaled).unwrap();
            prop_assert!((a - b).abs() < 1e-9 * a.max(1.0));
        }
    }
}
