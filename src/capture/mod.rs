//! Pointer capture
//!
//! The host feeds raw pointer events into [`input::MouseRecorder`] and
//! describes its layout through [`context::LayoutSource`].

pub mod context;
pub mod input;
pub mod traits;

pub use context::{BoundingBox, ContextEntry, ContextIndex, CursorGlyph, CursorStyle, LayoutSource};
pub use traits::{EventDisposition, InputHost, ListenerKind, PointerEvent};
