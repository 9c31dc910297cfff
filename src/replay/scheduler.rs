//! Replay state machine
//!
//! `Idle -> Playing -> (Idle | Complete)`, where `Complete` fires the
//! completion callback and drops straight back to `Idle`.
//!
//! The scheduler never sleeps on its own. It exposes the next instant it
//! needs attention via [`ReplayScheduler::next_deadline`] and does its work
//! when [`ReplayScheduler::tick`] is called at or after that instant. The
//! tokio driver in [`crate::replay::driver`] is the usual caller.

use crate::capture::context::{ContextIndex, CursorStyle};
use crate::capture::input::types::{MouseButton, MouseSnapshot, Point, SnapshotKind};
use crate::config::{ClickAnimations, MouseConfig};
use crate::processing::trail::TrailBuffer;
use crate::replay::surface::{
    AnimationVisual, ClickAnimation, ReplaySurface, CLICK_ANIMATION_LIFETIME,
};
use crate::replay::task::ScheduledTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Smallest delay between two steps, so a 0ms gap still yields
const MIN_STEP_DELAY: Duration = Duration::from_millis(1);

/// Called once per playback that runs to the end
pub type CompletionCallback = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    Playing,
}

pub struct ReplayScheduler<S: ReplaySurface> {
    surface: S,
    click_animations: ClickAnimations,
    replay_with_trail: bool,
    replay_trail_length: f64,

    log: Arc<[MouseSnapshot]>,
    context: Arc<ContextIndex>,
    state: ReplayState,
    next_step: ScheduledTask<usize>,

    cursor: Option<Point>,
    cursor_style: CursorStyle,
    animations: Vec<ClickAnimation>,
    last_animation_id: u64,
    trail: TrailBuffer,

    on_complete: Option<CompletionCallback>,
}

impl<S: ReplaySurface> ReplayScheduler<S> {
    pub fn new(surface: S, config: &MouseConfig) -> Self {
        Self {
            surface,
            click_animations: config.click_animations,
            replay_with_trail: config.replay_with_trail,
            replay_trail_length: config.replay_trail_length(),
            log: Arc::from(Vec::new()),
            context: Arc::new(ContextIndex::default()),
            state: ReplayState::Idle,
            next_step: ScheduledTask::new(),
            cursor: None,
            cursor_style: CursorStyle::Default,
            animations: Vec::new(),
            last_animation_id: 0,
            trail: TrailBuffer::new(config.trail_capacity()),
            on_complete: None,
        }
    }

    /// Register the completion notification
    pub fn on_complete(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Start playing `log` from its first snapshot.
    ///
    /// An empty log leaves the scheduler idle. Starting while already
    /// playing stops the current playback first; logs are never spliced.
    pub fn start(
        &mut self,
        log: impl Into<Arc<[MouseSnapshot]>>,
        context: Arc<ContextIndex>,
        now: Instant,
    ) {
        let log = log.into();

        if self.state == ReplayState::Playing {
            tracing::debug!("Replay restarted with a new log");
            self.stop();
        }

        if log.is_empty() {
            tracing::debug!("Ignoring replay of an empty log");
            return;
        }

        tracing::info!("Replay started ({} snapshots)", log.len());
        self.log = log;
        self.context = context;
        self.state = ReplayState::Playing;
        self.next_step.arm(now, 0);
    }

    /// Cancel the pending step and clear every transient visual
    pub fn stop(&mut self) {
        let was_playing = self.state == ReplayState::Playing;
        let has_visuals = self.cursor.is_some()
            || self.cursor_style != CursorStyle::Default
            || !self.animations.is_empty()
            || !self.trail.is_empty();

        if !was_playing && !has_visuals {
            return;
        }

        self.next_step.cancel();
        self.state = ReplayState::Idle;
        self.reset_cursor();
        if !self.animations.is_empty() {
            self.animations.clear();
            self.surface.clear_click_animations();
        }

        if was_playing {
            tracing::info!("Replay stopped");
        }
    }

    /// Do whatever is due at `now`: expire click markers, run the next step
    pub fn tick(&mut self, now: Instant) {
        self.expire_animations(now);

        if let Some(index) = self.next_step.take_due(now) {
            self.step(index, now);
        }
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let expiry = self.animations.iter().map(|a| a.expires_at).min();
        match (self.next_step.due(), expiry) {
            (Some(step), Some(expiry)) => Some(step.min(expiry)),
            (step, expiry) => step.or(expiry),
        }
    }

    fn step(&mut self, index: usize, now: Instant) {
        let log = Arc::clone(&self.log);
        let Some(snapshot) = log.get(index) else {
            return;
        };
        let position = snapshot.position();

        tracing::trace!(
            "Replay step {} ({:?} at {}, {})",
            index,
            snapshot.kind,
            position.x,
            position.y
        );

        self.cursor = Some(position);
        self.surface.move_cursor(position);

        if snapshot.kind == SnapshotKind::Scroll {
            self.surface.scroll_to(snapshot.scroll_position);
        }

        if snapshot.kind == SnapshotKind::Down {
            if let Some(button) = snapshot.button {
                self.spawn_click_animation(button, position, now);
            }
        }

        let style = self.context.cursor_at(position);
        if *style != self.cursor_style {
            self.cursor_style = style.clone();
            self.surface.set_cursor_style(&self.cursor_style);
        }

        if self.replay_with_trail {
            self.trail.push(position.offset(snapshot.scroll_position));
            self.surface.draw_trail(&self.trail.within(self.replay_trail_length));
        }

        match log.get(index + 1) {
            Some(next) => {
                let delay = step_delay(next.timestamp);
                self.next_step.arm(now + delay, index + 1);
            }
            None => self.complete(),
        }
    }

    fn complete(&mut self) {
        self.state = ReplayState::Idle;
        self.next_step.cancel();
        self.reset_cursor();

        tracing::info!("Replay complete");
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn reset_cursor(&mut self) {
        if self.cursor.take().is_some() {
            self.surface.hide_cursor();
        }
        if self.cursor_style != CursorStyle::Default {
            self.cursor_style = CursorStyle::Default;
            self.surface.set_cursor_style(&self.cursor_style);
        }
        if !self.trail.is_empty() {
            self.trail.clear();
            self.surface.draw_trail(&[]);
        }
    }

    fn spawn_click_animation(&mut self, raw_button: u8, position: Point, now: Instant) {
        let Some(button) = MouseButton::from_raw(raw_button.into()) else {
            return;
        };
        let settings = self.click_animations.for_button(button);
        if !settings.enabled {
            return;
        }

        self.last_animation_id += 1;
        let animation = ClickAnimation {
            id: self.last_animation_id,
            position,
            button,
            visual: if settings.custom {
                AnimationVisual::Custom
            } else {
                AnimationVisual::Default
            },
            expires_at: now + CLICK_ANIMATION_LIFETIME,
        };

        self.surface.spawn_click_animation(&animation);
        self.animations.push(animation);
    }

    fn expire_animations(&mut self, now: Instant) {
        let surface = &mut self.surface;
        self.animations.retain(|animation| {
            if animation.expires_at <= now {
                surface.remove_click_animation(animation.id);
                false
            } else {
                true
            }
        });
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ReplayState::Playing
    }

    /// Virtual cursor position, `None` when not replaying
    pub fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }

    pub fn cursor_style(&self) -> &CursorStyle {
        &self.cursor_style
    }

    pub fn active_animations(&self) -> &[ClickAnimation] {
        &self.animations
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Wait before a step recorded `timestamp_ms` after the previous one
fn step_delay(timestamp_ms: f64) -> Duration {
    let nanos = (timestamp_ms * 1_000_000.0).round();
    let delay = if nanos.is_finite() && nanos > 0.0 && nanos < u64::MAX as f64 {
        Duration::from_nanos(nanos as u64)
    } else {
        Duration::ZERO
    };
    delay.max(MIN_STEP_DELAY)
}
