//! Head movement estimation
//!
//! Only a neutral estimator exists; the value is reported alongside each frame
//! but never feeds the drowsiness decision.

use crate::landmarks::FaceLandmarks;

pub trait HeadMovementEstimator {
    /// Extent of head movement for this frame, 0.0 meaning none
    fn estimate(&self, landmarks: &FaceLandmarks) -> f64;
}

/// Always reports no movement
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralHeadMovement;

impl HeadMovementEstimator for NeutralHeadMovement {
    fn estimate(&self, _landmarks: &FaceLandmarks) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::tests::face;

    #[test]
    fn test_neutral_estimate() {
        assert_eq!(NeutralHeadMovement.estimate(&face(4.0)), 0.0);
    }
}
