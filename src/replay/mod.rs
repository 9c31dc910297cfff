//! Visual replay of a recorded snapshot log
//!
//! [`scheduler::ReplayScheduler`] is the timing state machine,
//! [`driver`] runs it on a tokio task, and the host renders through
//! [`surface::ReplaySurface`].

pub mod driver;
pub mod scheduler;
pub mod surface;
pub mod task;

pub use driver::{spawn_replay, ReplayHandle};
pub use scheduler::{ReplayScheduler, ReplayState};
pub use surface::{AnimationVisual, ClickAnimation, ReplayStats, ReplaySurface, TracingSurface};
