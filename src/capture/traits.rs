//! Host-side capture interfaces
//!
//! The recorder never talks to a windowing system directly. The host owns
//! the real event listeners and forwards what it receives as
//! [`PointerEvent`]s; the recorder tells the host which listeners it needs
//! through [`InputHost`].

use crate::capture::input::types::Point;

/// Listener kinds a recording session installs on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerDown,
    PointerUp,
    Wheel,
    /// Suppresses the native context menu while recording
    ContextMenu,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 5] = [
        ListenerKind::PointerMove,
        ListenerKind::PointerDown,
        ListenerKind::PointerUp,
        ListenerKind::Wheel,
        ListenerKind::ContextMenu,
    ];
}

impl std::fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerKind::PointerMove => write!(f, "pointer-move"),
            ListenerKind::PointerDown => write!(f, "pointer-down"),
            ListenerKind::PointerUp => write!(f, "pointer-up"),
            ListenerKind::Wheel => write!(f, "wheel"),
            ListenerKind::ContextMenu => write!(f, "context-menu"),
        }
    }
}

/// Environment the recorder captures from
pub trait InputHost {
    /// Current absolute page scroll offset
    fn scroll_position(&self) -> Point;

    /// Start delivering events of this kind to the recorder
    fn subscribe(&mut self, kind: ListenerKind);

    /// Stop delivering events of this kind
    fn unsubscribe(&mut self, kind: ListenerKind);
}

/// Raw input as delivered by the host, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    /// `button` is the host's raw id; only 0, 1 and 2 are recorded
    Down { x: f64, y: f64, button: i16 },
    Up { x: f64, y: f64, button: i16 },
    Wheel { x: f64, y: f64, delta_y: f64 },
    ContextMenu,
}

/// What the host should do with the native default action of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Passthrough,
    PreventDefault,
}
