use serde::{Deserialize, Serialize};

/// Screen coordinates, viewport-relative unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Translate by a scroll offset (viewport -> page coordinates)
    pub fn offset(&self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }

    /// Point `t` of the way from `self` towards `other` (0.0..=1.0)
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Pointer buttons the recorder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Map a raw host button id (0 = left, 1 = middle, 2 = right).
    ///
    /// Any other id has no mapping and is dropped by the recorder.
    pub fn from_raw(id: i16) -> Option<Self> {
        match id {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    /// Numeric id as stored in snapshots
    pub fn id(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

impl std::fmt::Display for MouseButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MouseButton::Left => write!(f, "left"),
            MouseButton::Middle => write!(f, "middle"),
            MouseButton::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonStates {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl ButtonStates {
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
        }
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    Move,
    Down,
    Up,
    Scroll,
}

/// One recorded instant of pointer, button and scroll state.
///
/// `timestamp` is the delay in milliseconds since the previous snapshot
/// (or since recording start for the first one), not an absolute time.
/// Whole milliseconds when recorded here; logs from elsewhere may carry
/// fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseSnapshot {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
    #[serde(rename = "type")]
    pub kind: SnapshotKind,
    /// Raw button id, only present on `down`/`up`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button: Option<u8>,
    /// Button state after this event was applied
    pub button_states: ButtonStates,
    /// Absolute page scroll offset at event time
    pub scroll_position: Point,
    /// Wheel delta, only present on `scroll`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_delta: Option<f64>,
}

impl MouseSnapshot {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Ordered snapshot sequence, append-only while recording
pub type SnapshotLog = Vec<MouseSnapshot>;

/// Live pointer state tracked by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseState {
    pub position: Point,
    pub button_states: ButtonStates,
    pub scroll_position: Point,
}
