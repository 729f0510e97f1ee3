//! Per-subject monitoring session
//!
//! Drives the detector from a frame stream: sampling, landmark lookup,
//! counter reset policy and early exit once drowsiness is signalled.

use metrics::counter;
use tracing::{debug, info, warn};

use crate::analysis::{FrameObservation, FrameReport, SessionReport};
use crate::ear::average_ear;
use crate::head::{HeadMovementEstimator, NeutralHeadMovement};
use crate::landmarks::LandmarkProvider;
use crate::sampler::sample_every;
use crate::{DmsConfig, DmsError, DrowsinessDetector, NoFacePolicy};

/// One monitoring session: a detector plus the collaborators feeding it
pub struct DrowsinessSession<P, H = NeutralHeadMovement> {
    config: DmsConfig,
    detector: DrowsinessDetector,
    provider: P,
    head: H,
}

impl<P> DrowsinessSession<P, NeutralHeadMovement> {
    /// Create a session with the neutral head movement estimator
    pub fn new(config: DmsConfig, provider: P) -> Result<Self, DmsError> {
        Self::with_head_estimator(config, provider, NeutralHeadMovement)
    }
}

impl<P, H: HeadMovementEstimator> DrowsinessSession<P, H> {
    pub fn with_head_estimator(config: DmsConfig, provider: P, head: H) -> Result<Self, DmsError> {
        config.validate()?;

        Ok(Self {
            detector: DrowsinessDetector::from_config(&config)?,
            config,
            provider,
            head,
        })
    }

    /// Analyze a single frame and apply the counter reset policy
    pub fn process_frame<F>(&mut self, frame: &F) -> Result<FrameReport, DmsError>
    where
        P: LandmarkProvider<F>,
    {
        let landmarks = self.provider.detect(frame)?;
        counter!("dms_frames_analyzed_total").increment(1);

        let Some(landmarks) = landmarks else {
            counter!("dms_frames_without_face_total").increment(1);
            debug!("No face detected");

            if self.config.no_face_policy == NoFacePolicy::Reset {
                self.detector.reset_consecutive_drowsy_frames();
            }
            return Ok(self.report(FrameObservation::NoFace, 0.0));
        };

        let head_movement = self.head.estimate(&landmarks);

        let observation = match average_ear(&landmarks.left_eye(), &landmarks.right_eye()) {
            Ok(ear) => {
                let closed = self.detector.observe_ear(ear);
                if closed {
                    counter!("dms_closed_eye_frames_total").increment(1);
                } else {
                    self.detector.reset_consecutive_drowsy_frames();
                }
                FrameObservation::Eyes { ear, closed }
            }
            Err(DmsError::DegenerateGeometry { horizontal, vertical }) => {
                warn!(horizontal, vertical, "Skipping frame with degenerate eye contour");
                FrameObservation::Degenerate
            }
            Err(e) => return Err(e),
        };

        Ok(self.report(observation, head_movement))
    }

    /// Analyze every `sample_stride`-th frame until drowsiness is signalled
    /// or the stream ends.
    pub fn run<F, I>(&mut self, frames: I) -> Result<SessionReport, DmsError>
    where
        P: LandmarkProvider<F>,
        I: IntoIterator<Item = F>,
    {
        let mut report = SessionReport::default();
        let mut sampled = sample_every(frames, self.config.sample_stride);

        debug!("Starting session run with stride {}", self.config.sample_stride);

        for (index, frame) in sampled.by_ref() {
            let frame_report = self.process_frame(&frame)?;
            report.frames_analyzed += 1;

            match frame_report.observation {
                FrameObservation::NoFace => report.frames_without_face += 1,
                FrameObservation::Degenerate => report.frames_degenerate += 1,
                FrameObservation::Eyes { .. } => {}
            }

            report.peak_consecutive_drowsy_frames = report
                .peak_consecutive_drowsy_frames
                .max(frame_report.consecutive_drowsy_frames);

            if frame_report.drowsy {
                counter!("dms_drowsiness_detected_total").increment(1);
                report.drowsy = true;
                report.trigger_frame = Some(index);
                break;
            }
        }

        report.frames_read = sampled.frames_read();

        info!(
            drowsy = report.drowsy,
            frames_read = report.frames_read,
            frames_analyzed = report.frames_analyzed,
            "Session run finished"
        );
        Ok(report)
    }

    /// Start over for a new subject
    pub fn reset(&mut self) {
        self.detector.reset_consecutive_drowsy_frames();
    }

    pub fn detector(&self) -> &DrowsinessDetector {
        &self.detector
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    fn report(&self, observation: FrameObservation, head_movement: f64) -> FrameReport {
        FrameReport {
            observation,
            consecutive_drowsy_frames: self.detector.consecutive_drowsy_frames(),
            drowsy: self.detector.is_drowsy(),
            head_movement,
        }
    }
}
