//! Command handlers
//!
//! Thin wrappers that turn files on disk into library calls. The binary is
//! the only caller.

pub mod replay;

pub use replay::{load_action_file, load_config_file, replay_file, replay_log, ReplaySummary};
