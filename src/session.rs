//! Recording and replay session
//!
//! One [`MouseSession`] owns the recorder, the context index captured when
//! the session was created, and the replay driver. It is the single handle
//! the host talks to.

use crate::action::codec::{decode_actions, MouseAction};
use crate::capture::context::{ContextIndex, LayoutSource};
use crate::capture::input::channel::MouseRecorder;
use crate::capture::input::types::MouseState;
use crate::capture::traits::{EventDisposition, InputHost, PointerEvent};
use crate::config::MouseConfig;
use crate::error::{RecordingResult, ReplayResult};
use crate::replay::driver::{spawn_replay, ReplayHandle};
use crate::replay::scheduler::{ReplayScheduler, ReplayState};
use crate::replay::surface::ReplaySurface;
use std::sync::Arc;
use tokio::sync::watch;

pub struct MouseSession<H: InputHost, S: ReplaySurface> {
    recorder: MouseRecorder<H>,
    context: Arc<ContextIndex>,
    replay: ReplayHandle<S>,
    replaying: bool,
}

impl<H, S> MouseSession<H, S>
where
    H: InputHost,
    S: ReplaySurface + Send + 'static,
{
    /// Build a session. Must be called inside a tokio runtime.
    ///
    /// The layout is read once here; later layout changes are not seen.
    pub fn new(
        host: H,
        layout: &impl LayoutSource,
        scheduler: ReplayScheduler<S>,
        config: MouseConfig,
    ) -> Self {
        let context = Arc::new(ContextIndex::capture(layout));
        tracing::info!("Mouse session created ({} context regions)", context.len());

        Self {
            recorder: MouseRecorder::new(host, config),
            context,
            replay: spawn_replay(scheduler),
            replaying: false,
        }
    }

    pub fn handle_event(&mut self, event: PointerEvent) -> EventDisposition {
        self.recorder.handle_event(event)
    }

    pub fn start_recording(&mut self) -> RecordingResult<()> {
        self.recorder.start()
    }

    pub fn stop_recording(&mut self) {
        self.recorder.stop();
    }

    pub fn clear(&mut self) {
        self.recorder.clear();
    }

    /// Load the host's action list into the session.
    ///
    /// An empty list changes nothing. A single mouse action replaces the log
    /// and restarts replay if it is on. Anything else fails and leaves both
    /// the log and any running replay untouched.
    pub async fn drive(&mut self, actions: &[MouseAction]) -> ReplayResult<()> {
        let Some(log) = decode_actions(actions)? else {
            return Ok(());
        };

        let log: Arc<[_]> = log.into();
        self.recorder.replace_log(log.to_vec());

        if self.replaying {
            self.replay.start(log, Arc::clone(&self.context)).await?;
        }
        Ok(())
    }

    /// Turn replay of the current log on or off
    pub async fn set_replaying(&mut self, replaying: bool) -> ReplayResult<()> {
        self.replaying = replaying;
        if replaying {
            let log = self.recorder.snapshots().to_vec();
            self.replay.start(log, Arc::clone(&self.context)).await
        } else {
            self.replay.stop().await
        }
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn replay_state(&self) -> ReplayState {
        self.replay.state()
    }

    pub fn recorder(&self) -> &MouseRecorder<H> {
        &self.recorder
    }

    pub fn mouse_state(&self) -> MouseState {
        self.recorder.state()
    }

    pub fn context(&self) -> &ContextIndex {
        &self.context
    }

    /// Encoded log updates
    pub fn subscribe(&self) -> watch::Receiver<MouseAction> {
        self.recorder.subscribe()
    }

    /// Stop the replay driver and hand the scheduler back
    pub async fn shutdown(self) -> ReplayResult<ReplayScheduler<S>> {
        let Self {
            recorder, replay, ..
        } = self;
        drop(recorder);
        let scheduler = replay.shutdown().await?;
        tracing::info!("Mouse session closed");
        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::codec::encode_snapshots;
    use crate::capture::context::{BoundingBox, ContextEntry, CursorStyle};
    use crate::capture::input::types::{Point, SnapshotKind};
    use crate::error::{CodecError, ReplayError};
    use crate::testing::{clean_replay_log, snapshot, FakeHost, RecordingSurface, SurfaceCall};
    use std::time::Duration;

    struct Layout(Vec<ContextEntry>);

    impl LayoutSource for Layout {
        fn layout(&self) -> Vec<ContextEntry> {
            self.0.clone()
        }
    }

    fn session(surface: &RecordingSurface) -> MouseSession<FakeHost, RecordingSurface> {
        let config = MouseConfig::default();
        let scheduler = ReplayScheduler::new(surface.clone(), &config);
        MouseSession::new(FakeHost::default(), &Layout(Vec::new()), scheduler, config)
    }

    fn moves(surface: &RecordingSurface) -> Vec<Point> {
        surface
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Move(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_action_list_is_noop() {
        let surface = RecordingSurface::default();
        let mut session = session(&surface);
        session.drive(&[encode_snapshots(&clean_replay_log()).unwrap()]).await.unwrap();

        session.drive(&[]).await.unwrap();
        assert_eq!(session.recorder().snapshots().len(), 3);
        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_replaces_log_and_restarts_replay() {
        let surface = RecordingSurface::default();
        let mut session = session(&surface);

        session.set_replaying(true).await.unwrap();
        // Nothing recorded yet, so nothing plays
        assert_eq!(session.replay_state(), ReplayState::Idle);

        let action = encode_snapshots(&clean_replay_log()).unwrap();
        session.drive(&[action.clone()]).await.unwrap();

        assert_eq!(session.recorder().snapshots(), clean_replay_log().as_slice());
        assert_eq!(session.recorder().action(), action);
        assert_eq!(session.replay_state(), ReplayState::Playing);
        assert_eq!(moves(&surface), vec![Point::new(0.0, 0.0)]);
        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_composite_actions_leave_replay_untouched() {
        let surface = RecordingSurface::default();
        let mut session = session(&surface);
        session.drive(&[encode_snapshots(&clean_replay_log()).unwrap()]).await.unwrap();
        session.set_replaying(true).await.unwrap();

        let composite = [
            MouseAction::new("left-click", "{}"),
            MouseAction::new("mouse", "[]"),
        ];
        let result = session.drive(&composite).await;
        assert!(matches!(
            result,
            Err(ReplayError::Codec(CodecError::UnsupportedCompositeAction(_)))
        ));

        // The running playback keeps going to the end
        assert_eq!(session.recorder().snapshots().len(), 3);
        assert_eq!(session.replay_state(), ReplayState::Playing);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            moves(&surface),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 0.0)]
        );
        assert_eq!(session.replay_state(), ReplayState::Idle);
        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_action_fails_closed() {
        let surface = RecordingSurface::default();
        let mut session = session(&surface);

        let result = session.drive(&[MouseAction::new("mouse", "[{\"x\": 1")]).await;
        assert!(matches!(result, Err(ReplayError::Codec(CodecError::MalformedAction(_)))));
        assert!(session.recorder().snapshots().is_empty());
        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_then_replay_uses_captured_context() {
        let surface = RecordingSurface::default();
        let config = MouseConfig::default();
        let layout = Layout(vec![ContextEntry::new(
            BoundingBox::from_origin_size(0.0, 0.0, 50.0, 20.0),
            "text",
        )]);
        let scheduler = ReplayScheduler::new(surface.clone(), &config);
        let mut session = MouseSession::new(FakeHost::default(), &layout, scheduler, config);

        session.start_recording().unwrap();
        session.handle_event(PointerEvent::Move { x: 10.0, y: 10.0 });
        session.stop_recording();
        assert_eq!(session.recorder().snapshots()[0].kind, SnapshotKind::Move);

        session.set_replaying(true).await.unwrap();
        assert!(surface.calls().contains(&SurfaceCall::Style(CursorStyle::Text)));

        session.set_replaying(false).await.unwrap();
        assert!(!session.is_replaying());
        // Single-step log: completion already hid the cursor and reset the style
        assert!(surface
            .calls()
            .ends_with(&[SurfaceCall::Hide, SurfaceCall::Style(CursorStyle::Default)]));
        session.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_empties_log() {
        let surface = RecordingSurface::default();
        let mut session = session(&surface);
        session
            .drive(&[encode_snapshots(&[snapshot(1.0, 1.0, 0, SnapshotKind::Move)]).unwrap()])
            .await
            .unwrap();

        session.clear();
        assert!(session.recorder().snapshots().is_empty());
        assert_eq!(session.recorder().action(), MouseAction::empty());
        session.shutdown().await.unwrap();
    }
}
