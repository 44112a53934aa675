//! Command trait, persisted command records and result types.

use std::any::Any;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use void_scene::{NodeId, SceneError, SceneNode};

use crate::core::EditorState;

/// Result type for command execution.
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    #[error("Object not found: {0}")]
    ObjectNotFound(NodeId),

    #[error("Script not found: {0}")]
    ScriptNotFound(NodeId),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid command record: {0}")]
    Record(String),
}

/// Type tag of every concrete command, as written to `type` in a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    #[serde(rename = "SetPositionCommand")]
    SetPosition,
    #[serde(rename = "SetRotationCommand")]
    SetRotation,
    #[serde(rename = "SetScaleCommand")]
    SetScale,
    #[serde(rename = "SetColorCommand")]
    SetColor,
    #[serde(rename = "SetValueCommand")]
    SetValue,
    #[serde(rename = "SetGeometryCommand")]
    SetGeometry,
    #[serde(rename = "SetMaterialCommand")]
    SetMaterial,
    #[serde(rename = "AddObjectCommand")]
    AddObject,
    #[serde(rename = "RemoveObjectCommand")]
    RemoveObject,
    #[serde(rename = "MoveObjectCommand")]
    MoveObject,
    #[serde(rename = "AddScriptCommand")]
    AddScript,
    #[serde(rename = "RemoveScriptCommand")]
    RemoveScript,
    #[serde(rename = "SetScriptSourceCommand")]
    SetScriptSource,
    #[serde(rename = "MultiCommand")]
    Multi,
}

impl CommandKind {
    /// Default label for the undo/redo menu.
    pub fn description(&self) -> &'static str {
        match self {
            CommandKind::SetPosition => "Set Position",
            CommandKind::SetRotation => "Set Rotation",
            CommandKind::SetScale => "Set Scale",
            CommandKind::SetColor => "Set Color",
            CommandKind::SetValue => "Set Value",
            CommandKind::SetGeometry => "Set Geometry",
            CommandKind::SetMaterial => "Set Material",
            CommandKind::AddObject => "Add Object",
            CommandKind::RemoveObject => "Remove Object",
            CommandKind::MoveObject => "Move Object",
            CommandKind::AddScript => "Add Script",
            CommandKind::RemoveScript => "Remove Script",
            CommandKind::SetScriptSource => "Set Script Source",
            CommandKind::Multi => "Multiple Changes",
        }
    }
}

/// A persisted command: `type`, `id`, `name` and the command's own fields.
/// Targets are referenced by id and resolved when the command runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// What an updatable command edits; two commands with equal keys may merge
/// under [`crate::core::MergePolicy::SameTarget`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub target: NodeId,
    pub attribute: String,
}

impl MergeKey {
    pub fn new(target: &NodeId, attribute: impl Into<String>) -> Self {
        Self {
            target: target.clone(),
            attribute: attribute.into(),
        }
    }
}

/// A command that can be executed, undone, and redone.
///
/// Commands are the primary way to modify editor state. They capture both
/// the action and its inverse: the old value is read from the live object
/// when the command is constructed, so `undo` never depends on what
/// happened in between.
///
/// Callers hand commands to [`crate::core::History::execute`] rather than
/// calling `execute` directly.
pub trait Command: Send + Sync {
    fn kind(&self) -> CommandKind;

    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str {
        self.kind().description()
    }

    /// Apply the new value.
    fn execute(&mut self, state: &mut EditorState) -> CommandResult;

    /// Restore the old value.
    fn undo(&mut self, state: &mut EditorState) -> CommandResult;

    /// Whether consecutive commands of this kind may coalesce into one
    /// history entry.
    fn updatable(&self) -> bool {
        false
    }

    fn merge_key(&self) -> Option<MergeKey> {
        None
    }

    /// Take the new value of `other`, keeping this command's old value.
    /// Returns `false` when `other` is not the same concrete command.
    fn update(&mut self, _other: &dyn Command) -> bool {
        false
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError>;

    fn as_any(&self) -> &dyn Any;
}

/// Encode a command's serializable fields into a record.
pub(crate) fn encode<T: Serialize>(
    kind: CommandKind,
    name: &str,
    body: &T,
) -> Result<CommandRecord, CommandError> {
    match serde_json::to_value(body) {
        Ok(Value::Object(fields)) => Ok(CommandRecord {
            kind,
            id: 0,
            name: name.to_string(),
            fields,
        }),
        Ok(other) => Err(CommandError::Record(format!(
            "{:?} encoded to {} instead of an object",
            kind, other
        ))),
        Err(e) => Err(CommandError::Record(e.to_string())),
    }
}

/// Decode a record's fields back into a concrete command.
pub(crate) fn decode<T: DeserializeOwned>(record: &CommandRecord) -> Result<T, CommandError> {
    serde_json::from_value(Value::Object(record.fields.clone()))
        .map_err(|e| CommandError::Record(format!("{:?}: {}", record.kind, e)))
}

pub(crate) fn object_mut<'a>(
    state: &'a mut EditorState,
    id: &NodeId,
) -> Result<&'a mut SceneNode, CommandError> {
    state
        .object_by_id_mut(id)
        .ok_or_else(|| CommandError::ObjectNotFound(id.clone()))
}

pub(crate) fn object<'a>(state: &'a EditorState, id: &NodeId) -> Result<&'a SceneNode, CommandError> {
    state
        .object_by_id(id)
        .ok_or_else(|| CommandError::ObjectNotFound(id.clone()))
}
