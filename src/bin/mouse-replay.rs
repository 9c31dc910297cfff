//! mouse-replay - play a recorded mouse action file
//!
//! Replays the log in real time against a logging surface and prints a
//! summary. Set `RUST_LOG=mouse_replay=trace` to see every step.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mouse-replay")]
#[command(about = "Replay a recorded mouse action file")]
#[command(version)]
struct Cli {
    /// Action JSON: a single action, an action list, or a bare snapshot array
    action: PathBuf,
    /// Optional MouseConfig JSON
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    mouse_replay::init_tracing();
    let cli = Cli::parse();

    tracing::info!("Starting mouse-replay v{}", env!("CARGO_PKG_VERSION"));

    let summary = mouse_replay::commands::replay_file(&cli.action, cli.config.as_deref()).await?;
    println!("{}", summary);
    Ok(())
}
