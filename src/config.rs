//! Configuration consumed by the recorder and the replay scheduler
//!
//! Every field has a default so hosts can pass partial JSON; nothing in
//! here is allowed to fail on missing or odd values.

use crate::capture::input::types::MouseButton;
use serde::{Deserialize, Serialize};

/// Default trail arc length in pixels
pub const DEFAULT_TRAIL_LENGTH: f64 = 500.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MouseConfig {
    /// Feed the trail buffer while recording
    pub record_with_trail: bool,
    /// Trail length shown while recording (px of path)
    pub record_trail_length: f64,
    /// Feed and draw a trail during replay
    pub replay_with_trail: bool,
    /// Trail length shown during replay (px of path)
    pub replay_trail_length: f64,
    pub click_animations: ClickAnimations,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            record_with_trail: false,
            record_trail_length: DEFAULT_TRAIL_LENGTH,
            replay_with_trail: false,
            replay_trail_length: DEFAULT_TRAIL_LENGTH,
            click_animations: ClickAnimations::default(),
        }
    }
}

impl MouseConfig {
    pub fn record_trail_length(&self) -> f64 {
        sanitize_length(self.record_trail_length)
    }

    pub fn replay_trail_length(&self) -> f64 {
        sanitize_length(self.replay_trail_length)
    }

    /// Length a trail buffer must retain so either mode can be drawn from it
    pub fn trail_capacity(&self) -> f64 {
        self.record_trail_length().max(self.replay_trail_length())
    }
}

/// Per-button click animation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickAnimations {
    pub left: ButtonAnimation,
    pub middle: ButtonAnimation,
    pub right: ButtonAnimation,
}

impl ClickAnimations {
    pub fn for_button(&self, button: MouseButton) -> ButtonAnimation {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonAnimation {
    pub enabled: bool,
    /// Use the host's custom visual instead of the default ring
    pub custom: bool,
}

fn sanitize_length(length: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        length
    } else {
        0.0
    }
}
