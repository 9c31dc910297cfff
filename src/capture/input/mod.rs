//! Mouse input recording
//!
//! Records pointer movement, button presses and scrolling as a log of
//! [`types::MouseSnapshot`]s with relative timestamps.

pub mod channel;
pub mod types;

pub use channel::MouseRecorder;
pub use types::{
    ButtonStates, MouseButton, MouseSnapshot, MouseState, Point, SnapshotKind, SnapshotLog,
};
