//! Drowsiness Replay - Main Entry Point

use dms_replay::{init_logging, run_replay, ReplayArgs};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    info!("=== Drowsiness replay v{} ===", env!("CARGO_PKG_VERSION"));

    let args = ReplayArgs::parse(std::env::args().skip(1))?;
    let output = run_replay(&args).await?;

    if output.report.drowsy {
        warn!("Driver appears drowsy at frame {:?}", output.report.trigger_frame);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
