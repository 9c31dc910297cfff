//! Error types
//!
//! Codec failures are the only errors expected to reach a host during
//! normal use. Capture and replay apply defaults instead of failing.

use thiserror::Error;

/// Errors raised while converting between actions and snapshot logs
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Malformed action: {0}")]
    MalformedAction(#[source] serde_json::Error),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Unsupported composite action: {0}")]
    UnsupportedCompositeAction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Already recording")]
    AlreadyRecording,
}

/// Result type for recording operations
pub type RecordingResult<T> = Result<T, RecordingError>;

/// Errors that can occur while driving a replay
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Replay driver stopped")]
    DriverStopped,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for replay operations
pub type ReplayResult<T> = Result<T, ReplayError>;
