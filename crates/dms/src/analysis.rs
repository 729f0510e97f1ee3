//! Per-frame and per-session analysis results

use serde::{Deserialize, Serialize};

/// What was observed in a single analyzed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameObservation {
    /// Landmark provider found no face
    NoFace,

    /// Eyes measured; `closed` when the average EAR is below threshold
    Eyes { ear: f64, closed: bool },

    /// Eye corners collapsed, frame skipped
    Degenerate,
}

impl FrameObservation {
    pub fn face_detected(&self) -> bool {
        !matches!(self, FrameObservation::NoFace)
    }

    pub fn eyes_closed(&self) -> bool {
        matches!(self, FrameObservation::Eyes { closed: true, .. })
    }

    pub fn ear(&self) -> Option<f64> {
        match self {
            FrameObservation::Eyes { ear, .. } => Some(*ear),
            _ => None,
        }
    }
}

/// Result of analyzing one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub observation: FrameObservation,

    /// Closed-eye counter after this frame
    pub consecutive_drowsy_frames: u32,

    /// Drowsiness signal after this frame
    pub drowsy: bool,

    /// Head movement extent (0.0 when no face)
    pub head_movement: f64,
}

/// Result of a monitoring run over a frame stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Whether drowsiness was signalled
    pub drowsy: bool,

    /// Index of the frame that triggered the signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_frame: Option<usize>,

    /// Frames pulled from the source (sampled or not)
    pub frames_read: usize,

    /// Frames passed to the detector
    pub frames_analyzed: usize,

    /// Analyzed frames without a face
    pub frames_without_face: usize,

    /// Analyzed frames skipped for degenerate geometry
    pub frames_degenerate: usize,

    /// Longest closed-eye run seen
    pub peak_consecutive_drowsy_frames: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_accessors() {
        let closed = FrameObservation::Eyes { ear: 0.1, closed: true };
        assert!(closed.face_detected());
        assert!(closed.eyes_closed());
        assert_eq!(closed.ear(), Some(0.1));

        assert!(!FrameObservation::NoFace.face_detected());
        assert!(!FrameObservation::NoFace.eyes_closed());
        assert!(FrameObservation::Degenerate.face_detected());
        assert_eq!(FrameObservation::Degenerate.ear(), None);
    }
}
