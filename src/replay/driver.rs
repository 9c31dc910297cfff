//! Tokio driver for [`ReplayScheduler`]
//!
//! The scheduler lives on its own task. Commands arrive over a channel and
//! are acknowledged once applied; between commands the task sleeps until
//! the scheduler's next deadline.

use crate::capture::context::ContextIndex;
use crate::capture::input::types::MouseSnapshot;
use crate::error::{ReplayError, ReplayResult};
use crate::replay::scheduler::{ReplayScheduler, ReplayState};
use crate::replay::surface::ReplaySurface;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

enum ReplayCommand {
    Start {
        log: Arc<[MouseSnapshot]>,
        context: Arc<ContextIndex>,
        ack: oneshot::Sender<()>,
    },
    Stop {
        ack: oneshot::Sender<()>,
    },
}

/// Handle to a running replay driver
pub struct ReplayHandle<S: ReplaySurface> {
    commands: mpsc::UnboundedSender<ReplayCommand>,
    state: Arc<ParkingMutex<ReplayState>>,
    task: JoinHandle<ReplayScheduler<S>>,
}

/// Move `scheduler` onto a tokio task and return a handle to it
pub fn spawn_replay<S>(scheduler: ReplayScheduler<S>) -> ReplayHandle<S>
where
    S: ReplaySurface + Send + 'static,
{
    let (commands, rx) = mpsc::unbounded_channel();
    let state = Arc::new(ParkingMutex::new(scheduler.state()));
    let task = tokio::spawn(run(scheduler, rx, Arc::clone(&state)));

    ReplayHandle {
        commands,
        state,
        task,
    }
}

async fn run<S: ReplaySurface>(
    mut scheduler: ReplayScheduler<S>,
    mut rx: mpsc::UnboundedReceiver<ReplayCommand>,
    state: Arc<ParkingMutex<ReplayState>>,
) -> ReplayScheduler<S> {
    tracing::debug!("Replay driver started");

    loop {
        let deadline = scheduler.next_deadline();

        tokio::select! {
            biased;

            command = rx.recv() => match command {
                Some(ReplayCommand::Start { log, context, ack }) => {
                    scheduler.start(log, context, Instant::now());
                    // Run the first step before acknowledging
                    scheduler.tick(Instant::now());
                    *state.lock() = scheduler.state();
                    let _ = ack.send(());
                }
                Some(ReplayCommand::Stop { ack }) => {
                    scheduler.stop();
                    *state.lock() = scheduler.state();
                    let _ = ack.send(());
                }
                None => break,
            },

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                scheduler.tick(Instant::now());
            }
        }

        *state.lock() = scheduler.state();
    }

    scheduler.stop();
    tracing::debug!("Replay driver exited");
    scheduler
}

impl<S: ReplaySurface> ReplayHandle<S> {
    /// Play `log` from the start, replacing any playback in progress
    pub async fn start(
        &self,
        log: impl Into<Arc<[MouseSnapshot]>>,
        context: Arc<ContextIndex>,
    ) -> ReplayResult<()> {
        let (ack, done) = oneshot::channel();
        self.send(ReplayCommand::Start {
            log: log.into(),
            context,
            ack,
        })?;
        done.await.map_err(|_| ReplayError::DriverStopped)
    }

    /// Cancel playback and clear replay visuals
    pub async fn stop(&self) -> ReplayResult<()> {
        let (ack, done) = oneshot::channel();
        self.send(ReplayCommand::Stop { ack })?;
        done.await.map_err(|_| ReplayError::DriverStopped)
    }

    /// State as of the last command or step the driver processed
    pub fn state(&self) -> ReplayState {
        *self.state.lock()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == ReplayState::Playing
    }

    /// Stop the driver and take the scheduler back
    pub async fn shutdown(self) -> ReplayResult<ReplayScheduler<S>> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await.map_err(|e| {
            tracing::error!("Replay driver task failed: {}", e);
            ReplayError::DriverStopped
        })
    }

    fn send(&self, command: ReplayCommand) -> ReplayResult<()> {
        self.commands
            .send(command)
            .map_err(|_| ReplayError::DriverStopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::input::types::{Point, SnapshotKind};
    use crate::config::{ButtonAnimation, MouseConfig};
    use crate::testing::{clean_replay_log, snapshot, RecordingSurface, SurfaceCall};
    use std::time::Duration;

    fn left_click_config() -> MouseConfig {
        let mut config = MouseConfig::default();
        config.click_animations.left = ButtonAnimation {
            enabled: true,
            custom: false,
        };
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_clean_replay_in_virtual_time() {
        let surface = RecordingSurface::default();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let scheduler = ReplayScheduler::new(surface.clone(), &left_click_config())
            .on_complete(move || {
                let _ = done_tx.send(Instant::now());
            });
        let handle = spawn_replay(scheduler);

        let start = Instant::now();
        handle.start(clean_replay_log(), Arc::default()).await.unwrap();
        assert!(handle.is_playing());
        assert_eq!(surface.calls(), vec![SurfaceCall::Move(Point::new(0.0, 0.0))]);

        let completed_at = done_rx.recv().await.unwrap();
        assert_eq!(completed_at - start, Duration::from_millis(51));

        let timed = surface.timed_calls();
        assert_eq!(
            timed[1],
            (
                start + Duration::from_millis(50),
                SurfaceCall::Move(Point::new(10.0, 0.0))
            )
        );
        assert!(timed.iter().any(|(at, call)| {
            matches!(call, SurfaceCall::Spawn(_)) && *at - start == Duration::from_millis(51)
        }));

        let scheduler = handle.shutdown().await.unwrap();
        assert_eq!(scheduler.state(), ReplayState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_next_step() {
        let surface = RecordingSurface::default();
        let handle = spawn_replay(ReplayScheduler::new(surface.clone(), &MouseConfig::default()));

        handle.start(clean_replay_log(), Arc::default()).await.unwrap();
        tokio::time::advance(Duration::from_millis(20)).await;
        handle.stop().await.unwrap();
        assert_eq!(handle.state(), ReplayState::Idle);

        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Move(Point::new(0.0, 0.0)), SurfaceCall::Hide]
        );
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_while_playing() {
        let surface = RecordingSurface::default();
        let handle = spawn_replay(ReplayScheduler::new(surface.clone(), &MouseConfig::default()));

        handle.start(clean_replay_log(), Arc::default()).await.unwrap();
        tokio::time::advance(Duration::from_millis(10)).await;

        let replacement = vec![snapshot(7.0, 7.0, 0, SnapshotKind::Move)];
        handle.start(replacement, Arc::default()).await.unwrap();

        // Single-step log completes on its first step
        assert_eq!(handle.state(), ReplayState::Idle);
        let moves: Vec<Point> = surface
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Move(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![Point::new(0.0, 0.0), Point::new(7.0, 7.0)]);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_fail_after_driver_exits() {
        let scheduler = ReplayScheduler::new(RecordingSurface::default(), &MouseConfig::default());
        let handle = spawn_replay(scheduler);
        handle.task.abort();
        tokio::task::yield_now().await;

        let result = handle.stop().await;
        assert!(matches!(result, Err(ReplayError::DriverStopped)));
    }
}
