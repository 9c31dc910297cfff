//! File-based replay commands
//!
//! Used by the `mouse-replay` binary: load an action file and an optional
//! config, then play the log in real time against a [`TracingSurface`].

use crate::action::codec::decode_json;
use crate::capture::context::ContextIndex;
use crate::capture::input::types::{MouseSnapshot, SnapshotKind, SnapshotLog};
use crate::config::MouseConfig;
use crate::replay::driver::spawn_replay;
use crate::replay::scheduler::ReplayScheduler;
use crate::replay::surface::TracingSurface;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// What a finished replay did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    /// Button presses in the log
    pub clicks: usize,
    /// Click animations actually shown
    pub animations: usize,
    pub scrolls: usize,
    pub elapsed: Duration,
}

impl std::fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} steps, {} clicks ({} animated), {} scrolls in {}ms",
            self.steps,
            self.clicks,
            self.animations,
            self.scrolls,
            self.elapsed.as_millis()
        )
    }
}

/// Read and decode an action file (single action, action list, or bare log)
pub fn load_action_file(path: &Path) -> Result<SnapshotLog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read action file {}", path.display()))?;
    let log = decode_json(&content)
        .with_context(|| format!("Failed to decode action file {}", path.display()))?;

    tracing::info!("Loaded {} snapshots from {}", log.len(), path.display());
    Ok(log)
}

/// Read a config file, or fall back to defaults when none is given
pub fn load_config_file(path: Option<&Path>) -> Result<MouseConfig> {
    let Some(path) = path else {
        return Ok(MouseConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: MouseConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Play `log` to completion and report what happened
pub async fn replay_log(log: SnapshotLog, config: &MouseConfig) -> Result<ReplaySummary> {
    let clicks = count_kind(&log, SnapshotKind::Down);
    let started = Instant::now();

    if log.is_empty() {
        tracing::info!("Nothing to replay");
        return Ok(ReplaySummary {
            steps: 0,
            clicks,
            animations: 0,
            scrolls: 0,
            elapsed: Duration::ZERO,
        });
    }

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let scheduler = ReplayScheduler::new(TracingSurface::new(), config).on_complete(move || {
        let _ = done_tx.send(());
    });
    let handle = spawn_replay(scheduler);

    handle
        .start(log, Arc::new(ContextIndex::default()))
        .await
        .context("Failed to start replay")?;
    done_rx.recv().await.context("Replay ended without completing")?;
    let elapsed = started.elapsed();

    let scheduler = handle.shutdown().await.context("Failed to stop replay driver")?;
    let stats = scheduler.surface().stats();

    Ok(ReplaySummary {
        steps: stats.moves,
        clicks,
        animations: stats.clicks,
        scrolls: stats.scrolls,
        elapsed,
    })
}

/// Load both files and replay
pub async fn replay_file(action_path: &Path, config_path: Option<&Path>) -> Result<ReplaySummary> {
    let config = load_config_file(config_path)?;
    let log = load_action_file(action_path)?;
    replay_log(log, &config).await
}

fn count_kind(log: &[MouseSnapshot], kind: SnapshotKind) -> usize {
    log.iter().filter(|s| s.kind == kind).count()
}
