//! Replay output interface
//!
//! Replay is purely a visual overlay: the scheduler only ever asks the
//! host to draw things. Nothing here injects input into the system.

use crate::capture::context::CursorStyle;
use crate::capture::input::types::{MouseButton, Point};
use std::time::Duration;
use tokio::time::Instant;

/// How long a click marker stays visible
pub const CLICK_ANIMATION_LIFETIME: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationVisual {
    /// Built-in expanding ring
    Default,
    /// Host-provided visual for this button
    Custom,
}

/// Transient click marker
#[derive(Debug, Clone, PartialEq)]
pub struct ClickAnimation {
    /// Monotonically increasing within a scheduler
    pub id: u64,
    pub position: Point,
    pub button: MouseButton,
    pub visual: AnimationVisual,
    pub expires_at: Instant,
}

/// Visual side effects requested by the replay scheduler
pub trait ReplaySurface {
    /// Draw the virtual cursor at a viewport position
    fn move_cursor(&mut self, position: Point);

    /// Remove the virtual cursor (the host falls back to the live pointer)
    fn hide_cursor(&mut self);

    fn set_cursor_style(&mut self, style: &CursorStyle);

    /// Scroll the viewport to an absolute page offset
    fn scroll_to(&mut self, position: Point);

    fn spawn_click_animation(&mut self, animation: &ClickAnimation);

    fn remove_click_animation(&mut self, id: u64);

    fn clear_click_animations(&mut self);

    /// Redraw the replay trail; fewer than two points means draw nothing
    fn draw_trail(&mut self, _points: &[Point]) {}
}

/// Counters collected by [`TracingSurface`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub moves: usize,
    pub clicks: usize,
    pub scrolls: usize,
    pub cursor_changes: usize,
}

/// Headless surface that logs every request
#[derive(Debug, Default)]
pub struct TracingSurface {
    stats: ReplayStats,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }
}

impl ReplaySurface for TracingSurface {
    fn move_cursor(&mut self, position: Point) {
        self.stats.moves += 1;
        tracing::trace!("cursor -> ({}, {})", position.x, position.y);
    }

    fn hide_cursor(&mut self) {
        tracing::debug!("cursor hidden");
    }

    fn set_cursor_style(&mut self, style: &CursorStyle) {
        self.stats.cursor_changes += 1;
        tracing::debug!("cursor style -> {} ({:?})", style, style.glyph());
    }

    fn scroll_to(&mut self, position: Point) {
        self.stats.scrolls += 1;
        tracing::info!("scroll to ({}, {})", position.x, position.y);
    }

    fn spawn_click_animation(&mut self, animation: &ClickAnimation) {
        self.stats.clicks += 1;
        tracing::info!(
            "{} click #{} at ({}, {}) [{:?}]",
            animation.button,
            animation.id,
            animation.position.x,
            animation.position.y,
            animation.visual
        );
    }

    fn remove_click_animation(&mut self, id: u64) {
        tracing::trace!("click #{} expired", id);
    }

    fn clear_click_animations(&mut self) {
        tracing::trace!("click animations cleared");
    }
}
