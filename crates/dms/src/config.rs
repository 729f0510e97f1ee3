//! DMS configuration

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::DmsError;

/// Legacy variable names accepted alongside the `DMS_*` environment
const LEGACY_MAX_FRAMES_VAR: &str = "FRAMES_BEFORE_DROWSINESS_CONFIRMED";
const LEGACY_MIN_EAR_VAR: &str = "MINIMUM_EYE_ASPECT_RATIO_BEFORE_ASSUMED_CLOSED";

/// What a frame without a detected face does to the closed-eye counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoFacePolicy {
    /// Treat the frame as "eyes open" and reset the counter
    #[default]
    Reset,
    /// Treat the frame as missed: neither increment nor reset
    Skip,
}

/// DMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// Closed-eye frames tolerated before drowsiness is signalled.
    /// The signal fires once the counter is strictly greater than this.
    pub max_drowsy_frames_before_signal: u32,

    /// Average EAR below which the eyes are considered closed
    pub minimum_eye_aspect_ratio: f64,

    /// Analyze every Nth decoded frame
    pub sample_stride: usize,

    /// Counter handling for frames without a face
    pub no_face_policy: NoFacePolicy,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            max_drowsy_frames_before_signal: 3,
            minimum_eye_aspect_ratio: 0.25,
            sample_stride: 5,
            no_face_policy: NoFacePolicy::Reset,
        }
    }
}

impl DmsConfig {
    /// Create strict config (fires sooner, more sensitive to partial closure)
    pub fn strict() -> Self {
        Self {
            max_drowsy_frames_before_signal: 2,
            minimum_eye_aspect_ratio: 0.28,
            ..Default::default()
        }
    }

    /// Create lenient config (needs a longer closure to fire)
    pub fn lenient() -> Self {
        Self {
            max_drowsy_frames_before_signal: 5,
            minimum_eye_aspect_ratio: 0.2,
            ..Default::default()
        }
    }

    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// Sources in increasing priority:
    /// 1. built-in defaults
    /// 2. `file` (any format the `config` crate understands), if given and present
    /// 3. `DMS_*` variables, e.g. `DMS_MINIMUM_EYE_ASPECT_RATIO`
    /// 4. `FRAMES_BEFORE_DROWSINESS_CONFIRMED` and
    ///    `MINIMUM_EYE_ASPECT_RATIO_BEFORE_ASSUMED_CLOSED`
    pub fn load(file: Option<&Path>) -> Result<Self, DmsError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default(
                "max_drowsy_frames_before_signal",
                i64::from(defaults.max_drowsy_frames_before_signal),
            )?
            .set_default("minimum_eye_aspect_ratio", defaults.minimum_eye_aspect_ratio)?
            .set_default("sample_stride", defaults.sample_stride as i64)?
            .set_default("no_face_policy", "reset")?;

        if let Some(path) = file {
            debug!("Reading DMS settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("DMS").try_parsing(true))
            .set_override_option(
                "max_drowsy_frames_before_signal",
                std::env::var(LEGACY_MAX_FRAMES_VAR).ok(),
            )?
            .set_override_option(
                "minimum_eye_aspect_ratio",
                std::env::var(LEGACY_MIN_EAR_VAR).ok(),
            )?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;

        info!("Loaded DMS config: {:?}", config);
        Ok(config)
    }

    /// Reject non-positive thresholds and a zero sampling stride
    pub fn validate(&self) -> Result<(), DmsError> {
        validate_thresholds(
            self.max_drowsy_frames_before_signal,
            self.minimum_eye_aspect_ratio,
        )?;

        if self.sample_stride == 0 {
            return Err(DmsError::Config("sample_stride must be at least 1".into()));
        }

        Ok(())
    }
}

pub(crate) fn validate_thresholds(max_frames: u32, min_ear: f64) -> Result<(), DmsError> {
    if max_frames == 0 {
        return Err(DmsError::Config(
            "max_drowsy_frames_before_signal must be positive".into(),
        ));
    }

    if !min_ear.is_finite() || min_ear <= 0.0 {
        return Err(DmsError::Config(format!(
            "minimum_eye_aspect_ratio must be a positive number, got {min_ear}"
        )));
    }

    Ok(())
}
