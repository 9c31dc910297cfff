//! Geometry helpers shared by recording and replay

pub mod trail;

pub use trail::{path_length, TrailBuffer};
