//! Debounced drowsiness state machine

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::validate_thresholds;
use crate::ear::{average_ear, EyePoints};
use crate::{DmsConfig, DmsError};

/// Coarse detector phase, derived from the closed-eye counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorPhase {
    /// No closed-eye frames pending
    Alert,
    /// At least one consecutive closed-eye frame counted
    Accumulating,
}

/// Counts consecutive closed-eye frames for one monitored subject.
///
/// Drowsiness is level-triggered: [`is_drowsy`](Self::is_drowsy) is true
/// while the counter exceeds the threshold and turns false again as soon as
/// the counter is reset. `observe_*` never resets the counter on an open-eye
/// frame; that is the caller's call via
/// [`reset_consecutive_drowsy_frames`](Self::reset_consecutive_drowsy_frames).
#[derive(Debug, Clone)]
pub struct DrowsinessDetector {
    consecutive_drowsy_frames: u32,
    max_drowsy_frames_before_signal: u32,
    minimum_eye_aspect_ratio: f64,
}

impl DrowsinessDetector {
    /// Create a detector, rejecting non-positive thresholds
    pub fn new(
        max_drowsy_frames_before_signal: u32,
        minimum_eye_aspect_ratio: f64,
    ) -> Result<Self, DmsError> {
        validate_thresholds(max_drowsy_frames_before_signal, minimum_eye_aspect_ratio)?;

        Ok(Self {
            consecutive_drowsy_frames: 0,
            max_drowsy_frames_before_signal,
            minimum_eye_aspect_ratio,
        })
    }

    pub fn from_config(config: &DmsConfig) -> Result<Self, DmsError> {
        Self::new(
            config.max_drowsy_frames_before_signal,
            config.minimum_eye_aspect_ratio,
        )
    }

    /// Observe one frame's eyes. Returns whether the eyes are closed.
    ///
    /// A closed frame increments the counter. Degenerate eye geometry is
    /// returned as an error and leaves the counter unchanged.
    pub fn observe_frame(
        &mut self,
        left_eye: &EyePoints,
        right_eye: &EyePoints,
    ) -> Result<bool, DmsError> {
        let ear = average_ear(left_eye, right_eye)?;
        Ok(self.observe_ear(ear))
    }

    /// Observe an already averaged EAR. Returns whether the eyes are closed.
    pub fn observe_ear(&mut self, ear: f64) -> bool {
        // Equal to the threshold counts as open
        if ear < self.minimum_eye_aspect_ratio {
            self.consecutive_drowsy_frames = self.consecutive_drowsy_frames.saturating_add(1);
            debug!(
                ear,
                consecutive = self.consecutive_drowsy_frames,
                "Eyes closed"
            );

            let signal_at = self.max_drowsy_frames_before_signal.saturating_add(1);
            if self.consecutive_drowsy_frames == signal_at {
                info!(
                    "Drowsiness detected after {} consecutive closed-eye frames",
                    self.consecutive_drowsy_frames
                );
            }
            true
        } else {
            debug!(ear, "Eyes open");
            false
        }
    }

    /// True while the closed-eye run is strictly longer than the threshold
    pub fn is_drowsy(&self) -> bool {
        self.consecutive_drowsy_frames > self.max_drowsy_frames_before_signal
    }

    pub fn reset_consecutive_drowsy_frames(&mut self) {
        if self.consecutive_drowsy_frames > 0 {
            debug!(
                "Resetting closed-eye counter (was {})",
                self.consecutive_drowsy_frames
            );
        }
        self.consecutive_drowsy_frames = 0;
    }

    pub fn consecutive_drowsy_frames(&self) -> u32 {
        self.consecutive_drowsy_frames
    }

    pub fn max_drowsy_frames_before_signal(&self) -> u32 {
        self.max_drowsy_frames_before_signal
    }

    pub fn minimum_eye_aspect_ratio(&self) -> f64 {
        self.minimum_eye_aspect_ratio
    }

    pub fn phase(&self) -> DetectorPhase {
        if self.consecutive_drowsy_frames == 0 {
            DetectorPhase::Alert
        } else {
            DetectorPhase::Accumulating
        }
    }
}

impl Default for DrowsinessDetector {
    fn default() -> Self {
        let config = DmsConfig::default();
        Self {
            consecutive_drowsy_frames: 0,
            max_drowsy_frames_before_signal: config.max_drowsy_frames_before_signal,
            minimum_eye_aspect_ratio: config.minimum_eye_aspect_ratio,
        }
    }
}
