//! Facial landmark set and the external landmark provider boundary

use std::ops::Range;

use ndarray::{s, Array2};

use crate::ear::{EyePoints, Point};
use crate::DmsError;

/// Number of points in the Multi-PIE landmark layout
pub const LANDMARK_COUNT: usize = 68;

/// Subject's right eye (image left)
pub const RIGHT_EYE: Range<usize> = 36..42;
/// Subject's left eye (image right)
pub const LEFT_EYE: Range<usize> = 42..48;

/// 68-point facial landmarks, one `(x, y)` row per point
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Array2<f64>,
}

impl FaceLandmarks {
    /// Wrap a `(68, 2)` coordinate matrix
    pub fn from_array(points: Array2<f64>) -> Result<Self, DmsError> {
        if points.dim() != (LANDMARK_COUNT, 2) {
            return Err(DmsError::InvalidLandmarks(format!(
                "expected shape ({}, 2), got {:?}",
                LANDMARK_COUNT,
                points.dim()
            )));
        }
        Ok(Self { points })
    }

    pub fn from_points(points: &[Point]) -> Result<Self, DmsError> {
        if points.len() != LANDMARK_COUNT {
            return Err(DmsError::InvalidLandmarks(format!(
                "expected {} points, got {}",
                LANDMARK_COUNT,
                points.len()
            )));
        }

        let flat: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let points = Array2::from_shape_vec((LANDMARK_COUNT, 2), flat)
            .map_err(|e| DmsError::InvalidLandmarks(e.to_string()))?;
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        (index < LANDMARK_COUNT)
            .then(|| Point::new(self.points[[index, 0]], self.points[[index, 1]]))
    }

    pub fn left_eye(&self) -> EyePoints {
        self.eye(LEFT_EYE)
    }

    pub fn right_eye(&self) -> EyePoints {
        self.eye(RIGHT_EYE)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.points
    }

    fn eye(&self, range: Range<usize>) -> EyePoints {
        let rows = self.points.slice(s![range, ..]);
        let mut eye = [Point::default(); 6];
        for (slot, row) in eye.iter_mut().zip(rows.rows()) {
            *slot = Point::new(row[0], row[1]);
        }
        EyePoints::new(eye)
    }
}

/// External face/landmark detector.
///
/// `Ok(None)` means no face was found in the frame.
pub trait LandmarkProvider<F> {
    fn detect(&mut self, frame: &F) -> Result<Option<FaceLandmarks>, DmsError>;
}

impl<F, P: LandmarkProvider<F> + ?Sized> LandmarkProvider<F> for &mut P {
    fn detect(&mut self, frame: &F) -> Result<Option<FaceLandmarks>, DmsError> {
        (**self).detect(frame)
    }
}
