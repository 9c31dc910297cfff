//! Mouse Replay - record pointer activity and play it back as an overlay.
//!
//! The host forwards pointer events to a [`MouseSession`], which records
//! them as a log of [`MouseSnapshot`]s, publishes the log as a serialized
//! [`MouseAction`], and can replay any such log through a [`ReplaySurface`].

pub mod action;
pub mod capture;
pub mod commands;
pub mod config;
pub mod error;
pub mod processing;
pub mod replay;
pub mod session;

#[cfg(test)]
mod testing;

pub use action::{decode_action, decode_actions, decode_json, encode_snapshots, MouseAction};
pub use capture::input::{
    MouseButton, MouseRecorder, MouseSnapshot, MouseState, Point, SnapshotKind,
};
pub use capture::{ContextEntry, ContextIndex, CursorStyle, InputHost, LayoutSource, PointerEvent};
pub use config::MouseConfig;
pub use error::{CodecError, RecordingError, ReplayError};
pub use processing::TrailBuffer;
pub use replay::{spawn_replay, ReplayHandle, ReplayScheduler, ReplayState, ReplaySurface};
pub use session::MouseSession;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the `fmt` subscriber, filtered by `RUST_LOG`
///
/// Only binaries should call this; the library never installs a subscriber.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mouse_replay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
