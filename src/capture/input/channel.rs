use crate::action::codec::{encode_snapshots, MouseAction};
use crate::capture::input::types::{
    MouseButton, MouseSnapshot, MouseState, Point, SnapshotKind, SnapshotLog,
};
use crate::capture::traits::{EventDisposition, InputHost, ListenerKind, PointerEvent};
use crate::config::MouseConfig;
use crate::error::{RecordingError, RecordingResult};
use crate::processing::trail::TrailBuffer;
use tokio::sync::watch;
use tokio::time::Instant;

/// Event capture session.
///
/// Owns the live pointer state, the snapshot log and the recording trail.
/// The host forwards raw events through [`MouseRecorder::handle_event`];
/// every change to the log republishes the encoded action to subscribers.
pub struct MouseRecorder<H: InputHost> {
    host: H,
    config: MouseConfig,
    state: MouseState,
    snapshots: SnapshotLog,
    trail: TrailBuffer,
    is_recording: bool,
    subscribed: bool,
    last_snapshot_at: Instant,
    action_tx: watch::Sender<MouseAction>,
}

impl<H: InputHost> MouseRecorder<H> {
    pub fn new(host: H, config: MouseConfig) -> Self {
        let (action_tx, _) = watch::channel(MouseAction::empty());
        let trail = TrailBuffer::new(config.trail_capacity());

        Self {
            host,
            config,
            state: MouseState::default(),
            snapshots: Vec::new(),
            trail,
            is_recording: false,
            subscribed: false,
            last_snapshot_at: Instant::now(),
            action_tx,
        }
    }

    /// Begin a fresh recording: empty log, clock measured from now
    pub fn start(&mut self) -> RecordingResult<()> {
        if self.is_recording {
            return Err(RecordingError::AlreadyRecording);
        }

        self.snapshots.clear();
        self.trail.clear();
        self.last_snapshot_at = Instant::now();
        self.state.scroll_position = self.host.scroll_position();
        self.subscribe_listeners();
        self.is_recording = true;
        self.publish();

        tracing::info!("Mouse recording started");
        Ok(())
    }

    /// Stop recording; the log is kept, the trail is dropped
    pub fn stop(&mut self) {
        if !self.is_recording {
            return;
        }

        self.is_recording = false;
        self.unsubscribe_listeners();
        self.trail.clear();
        self.publish();

        tracing::info!("Mouse recording stopped (snapshots={})", self.snapshots.len());
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// Feed one host event through the recorder
    pub fn handle_event(&mut self, event: PointerEvent) -> EventDisposition {
        match event {
            PointerEvent::Move { x, y } => {
                self.state.position = Point::new(x, y);

                if self.is_recording && self.config.record_with_trail {
                    let scroll = self.host.scroll_position();
                    self.trail.push(self.state.position.offset(scroll));
                }

                if self.is_recording {
                    self.append(SnapshotKind::Move, None, None);
                }
            }
            PointerEvent::Down { x, y, button } => self.handle_button(x, y, button, true),
            PointerEvent::Up { x, y, button } => self.handle_button(x, y, button, false),
            PointerEvent::Wheel { x, y, delta_y } => {
                self.state.position = Point::new(x, y);
                self.state.scroll_position = self.host.scroll_position();

                if self.is_recording {
                    self.append(SnapshotKind::Scroll, None, Some(delta_y));
                }
            }
            PointerEvent::ContextMenu => {
                if self.is_recording {
                    return EventDisposition::PreventDefault;
                }
            }
        }

        EventDisposition::Passthrough
    }

    fn handle_button(&mut self, x: f64, y: f64, raw_button: i16, pressed: bool) {
        let Some(button) = MouseButton::from_raw(raw_button) else {
            tracing::trace!("Ignoring unmapped button id {}", raw_button);
            return;
        };

        self.state.position = Point::new(x, y);
        self.state.button_states.set(button, pressed);

        if self.is_recording {
            let kind = if pressed { SnapshotKind::Down } else { SnapshotKind::Up };
            self.append(kind, Some(button), None);
        }
    }

    fn append(
        &mut self,
        kind: SnapshotKind,
        button: Option<MouseButton>,
        scroll_delta: Option<f64>,
    ) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_snapshot_at);
        self.last_snapshot_at = now;

        let snapshot = MouseSnapshot {
            x: self.state.position.x,
            y: self.state.position.y,
            timestamp: elapsed.as_millis() as f64,
            kind,
            button: button.map(MouseButton::id),
            button_states: self.state.button_states,
            scroll_position: self.host.scroll_position(),
            scroll_delta,
        };

        tracing::trace!(
            "Recorded {:?} at ({}, {}) after {}ms",
            kind,
            snapshot.x,
            snapshot.y,
            snapshot.timestamp
        );

        self.snapshots.push(snapshot);
        self.publish();
    }

    /// Reset the log, the trail and the inter-event clock together
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.trail.clear();
        self.last_snapshot_at = Instant::now();
        self.publish();

        tracing::debug!("Mouse recording cleared");
    }

    /// Atomically swap in an externally supplied log
    pub fn replace_log(&mut self, log: SnapshotLog) {
        tracing::debug!(
            "Replacing snapshot log ({} -> {} snapshots)",
            self.snapshots.len(),
            log.len()
        );
        self.snapshots = log;
        self.publish();
    }

    pub fn snapshots(&self) -> &[MouseSnapshot] {
        &self.snapshots
    }

    pub fn state(&self) -> MouseState {
        self.state
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    /// Trail points at the recording trail length, page coordinates
    pub fn trail_points(&self) -> Vec<Point> {
        self.trail.within(self.config.record_trail_length())
    }

    /// The most recently published action
    pub fn action(&self) -> MouseAction {
        self.action_tx.borrow().clone()
    }

    /// Receive the re-encoded action whenever the log changes
    pub fn subscribe(&self) -> watch::Receiver<MouseAction> {
        self.action_tx.subscribe()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn publish(&self) {
        match encode_snapshots(&self.snapshots) {
            Ok(action) => {
                self.action_tx.send_replace(action);
            }
            Err(e) => tracing::warn!("Failed to encode mouse action: {}", e),
        }
    }

    fn subscribe_listeners(&mut self) {
        if self.subscribed {
            return;
        }
        for kind in ListenerKind::ALL {
            self.host.subscribe(kind);
        }
        self.subscribed = true;
    }

    fn unsubscribe_listeners(&mut self) {
        if !self.subscribed {
            return;
        }
        for kind in ListenerKind::ALL {
            self.host.unsubscribe(kind);
        }
        self.subscribed = false;
    }
}

impl<H: InputHost> Drop for MouseRecorder<H> {
    fn drop(&mut self) {
        self.unsubscribe_listeners();
    }
}
