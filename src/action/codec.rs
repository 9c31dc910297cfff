//! Conversion between snapshot logs and their transportable action form
//!
//! The wire shape is `{ "name": "mouse", "value": "<JSON array of snapshots>" }`.
//! Validation is shallow on purpose: array-ness and field presence are
//! checked, then the typed parse decides the rest.

use crate::capture::input::types::{MouseSnapshot, SnapshotLog};
use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only action name supported as a replay driver
pub const MOUSE_ACTION_NAME: &str = "mouse";

/// Fields every serialized snapshot must carry
const REQUIRED_SNAPSHOT_FIELDS: [&str; 6] = [
    "x",
    "y",
    "timestamp",
    "type",
    "buttonStates",
    "scrollPosition",
];

/// Named, serialized envelope around a snapshot log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseAction {
    pub name: String,
    pub value: String,
}

impl MouseAction {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A `"mouse"` action carrying an empty log
    pub fn empty() -> Self {
        Self::new(MOUSE_ACTION_NAME, "[]")
    }
}

impl Default for MouseAction {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wrap a serialized copy of `log` in a `"mouse"` action
pub fn encode_snapshots(log: &[MouseSnapshot]) -> CodecResult<MouseAction> {
    let value = serde_json::to_string(log).map_err(CodecError::Serialization)?;
    Ok(MouseAction::new(MOUSE_ACTION_NAME, value))
}

/// Parse a single action back into its snapshot log.
///
/// Actions with any other name are granular/composite actions, which are
/// not supported as drivers and are rejected rather than guessed at.
pub fn decode_action(action: &MouseAction) -> CodecResult<SnapshotLog> {
    if action.name != MOUSE_ACTION_NAME {
        return Err(CodecError::UnsupportedCompositeAction(format!(
            "granular action '{}' cannot drive replay, only a single '{}' action",
            action.name, MOUSE_ACTION_NAME
        )));
    }

    let value: Value = serde_json::from_str(&action.value).map_err(CodecError::MalformedAction)?;
    snapshots_from_value(value)
}

/// Decode the host's action list.
///
/// Returns `Ok(None)` when there is nothing to drive with. More than one
/// action is a composite sequence and is rejected as a whole.
pub fn decode_actions(actions: &[MouseAction]) -> CodecResult<Option<SnapshotLog>> {
    match actions {
        [] => Ok(None),
        [action] => decode_action(action).map(Some),
        _ => Err(CodecError::UnsupportedCompositeAction(format!(
            "{} actions supplied ({}), only a single '{}' action is supported",
            actions.len(),
            actions
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            MOUSE_ACTION_NAME
        ))),
    }
}

/// Decode free-form JSON text: a single action object, an array of
/// actions, or a bare array of snapshots.
pub fn decode_json(text: &str) -> CodecResult<SnapshotLog> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::MalformedAction)?;

    let single_action = value.as_object().map(is_action_shape).unwrap_or(false);
    let action_list = value
        .as_array()
        .map(|items| !items.is_empty() && items.iter().all(is_action_value))
        .unwrap_or(false);

    if single_action {
        let action: MouseAction = parse_action(value)?;
        return decode_action(&action);
    }
    if action_list {
        let actions: Vec<MouseAction> = parse_action(value)?;
        return Ok(decode_actions(&actions)?.unwrap_or_default());
    }
    if value.is_array() {
        return snapshots_from_value(value);
    }

    Err(CodecError::InvalidShape(format!(
        "expected an action or an array, found {}",
        json_kind(&value)
    )))
}

fn snapshots_from_value(value: Value) -> CodecResult<SnapshotLog> {
    let items = match &value {
        Value::Array(items) => items,
        other => {
            return Err(CodecError::InvalidShape(format!(
                "expected an array of snapshots, found {}",
                json_kind(other)
            )))
        }
    };

    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            CodecError::InvalidShape(format!(
                "snapshot {} is {}, expected an object",
                index,
                json_kind(item)
            ))
        })?;

        if let Some(missing) = REQUIRED_SNAPSHOT_FIELDS
            .iter()
            .find(|field| !object.contains_key(**field))
        {
            return Err(CodecError::InvalidShape(format!(
                "snapshot {} is missing field '{}'",
                index, missing
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| CodecError::InvalidShape(e.to_string()))
}

fn is_action_shape(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("name"), Some(Value::String(_)))
        && matches!(map.get("value"), Some(Value::String(_)))
}

fn is_action_value(value: &Value) -> bool {
    value.as_object().map(is_action_shape).unwrap_or(false)
}

fn parse_action<T: serde::de::DeserializeOwned>(value: Value) -> CodecResult<T> {
    serde_json::from_value(value).map_err(|e| CodecError::InvalidShape(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
