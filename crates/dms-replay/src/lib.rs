//! Landmark Replay
//!
//! Runs a drowsiness session over landmarks recorded from an external face
//! detector. A recording is a JSON array of frames:
//!
//! ```json
//! [{ "landmarks": [[x, y], ...] }, { "landmarks": null }]
//! ```
//!
//! where `landmarks` holds the 68-point set, or `null` when no face was found.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use dms::{
    DmsConfig, DmsError, DrowsinessSession, FaceLandmarks, LandmarkProvider, Point, SessionReport,
};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// One recorded frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub landmarks: Option<Vec<[f64; 2]>>,
}

/// Landmark provider that reads the landmarks stored in each recorded frame
#[derive(Debug, Default)]
pub struct RecordedLandmarks;

impl LandmarkProvider<RecordedFrame> for RecordedLandmarks {
    fn detect(&mut self, frame: &RecordedFrame) -> Result<Option<FaceLandmarks>, DmsError> {
        let Some(raw) = &frame.landmarks else {
            return Ok(None);
        };

        let points: Vec<Point> = raw.iter().copied().map(Point::from).collect();
        FaceLandmarks::from_points(&points).map(Some)
    }
}

/// Command line arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayArgs {
    /// Recording to replay
    pub recording: PathBuf,
    /// Optional settings file
    pub config: Option<PathBuf>,
}

impl ReplayArgs {
    /// Parse `<recording.json> [config-file]` (program name excluded)
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut args = args.into_iter();

        let Some(recording) = args.next() else {
            bail!("usage: dms-replay <recording.json> [config-file]");
        };
        let config = args.next().map(PathBuf::from);

        if let Some(extra) = args.next() {
            bail!("unexpected argument: {extra}");
        }

        Ok(Self {
            recording: PathBuf::from(recording),
            config,
        })
    }
}

/// Replay result printed to stdout
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutput {
    pub recording: String,
    pub config: DmsConfig,
    pub report: SessionReport,
}

pub fn parse_recording(json: &str) -> anyhow::Result<Vec<RecordedFrame>> {
    serde_json::from_str(json).context("invalid landmark recording")
}

/// Run one session over the recorded frames
pub fn replay(config: DmsConfig, frames: Vec<RecordedFrame>) -> Result<SessionReport, DmsError> {
    let mut session = DrowsinessSession::new(config, RecordedLandmarks)?;
    session.run(frames)
}

/// Load settings and the recording, then replay it
pub async fn run_replay(args: &ReplayArgs) -> anyhow::Result<ReplayOutput> {
    let config = DmsConfig::load(args.config.as_deref())?;

    let json = tokio::fs::read_to_string(&args.recording)
        .await
        .with_context(|| format!("failed to read {}", args.recording.display()))?;
    let frames = parse_recording(&json)?;

    info!("Replaying {} frames from {}", frames.len(), args.recording.display());

    let report = replay(config.clone(), frames)?;

    Ok(ReplayOutput {
        recording: display_path(&args.recording),
        config,
        report,
    })
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Initialize logging on stderr; `DMS_LOG_FORMAT=json` switches to JSON lines
pub fn init_logging() -> anyhow::Result<()> {
    let json = std::env::var("DMS_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let builder = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
