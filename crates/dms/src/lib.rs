//! Driver Monitoring System (DMS)
//!
//! Drowsiness detection from facial landmarks:
//! - Eye aspect ratio (EAR) estimation
//! - Debounced closed-eye counting
//! - Frame sampling and per-session monitoring
//!
//! Face and landmark detection are supplied by the caller through
//! [`LandmarkProvider`].

pub mod analysis;
pub mod config;
pub mod detector;
pub mod ear;
pub mod head;
pub mod landmarks;
pub mod sampler;
pub mod session;

pub use analysis::{FrameObservation, FrameReport, SessionReport};
pub use self::config::{DmsConfig, NoFacePolicy};
pub use detector::{DetectorPhase, DrowsinessDetector};
pub use ear::{average_ear, compute_ear, EyePoints, Point};
pub use head::{HeadMovementEstimator, NeutralHeadMovement};
pub use landmarks::{FaceLandmarks, LandmarkProvider};
pub use sampler::{sample_every, SampledFrames};
pub use session::DrowsinessSession;

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    /// Eye corners coincide or a lid distance is not finite, so the aspect
    /// ratio is undefined
    #[error("Degenerate eye contour: horizontal {horizontal}, vertical {vertical}")]
    DegenerateGeometry { horizontal: f64, vertical: f64 },

    #[error("Eye contour needs exactly 6 points, got {0}")]
    InvalidEyePoints(usize),

    #[error("Invalid landmark set: {0}")]
    InvalidLandmarks(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] ::config::ConfigError),

    /// Failure reported by the external landmark provider
    #[error("Landmark provider failed: {0}")]
    Provider(String),
}
