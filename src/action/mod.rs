//! Serialized form of a recording

pub mod codec;

pub use codec::{decode_action, decode_actions, decode_json, encode_snapshots, MouseAction};
