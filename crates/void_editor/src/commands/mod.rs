//! Command pattern implementation for undo/redo support.
//!
//! All editor modifications that should be undoable must go through
//! the command system.

mod command;
mod multi_command;
mod object_commands;
mod script_commands;
mod transform_commands;
mod value_commands;

pub use command::{Command, CommandError, CommandKind, CommandRecord, CommandResult, MergeKey};
pub use multi_command::MultiCommand;
pub use object_commands::{AddObjectCommand, MoveObjectCommand, RemoveObjectCommand};
pub use script_commands::{AddScriptCommand, RemoveScriptCommand, SetScriptSourceCommand};
pub use transform_commands::{SetPositionCommand, SetRotationCommand, SetScaleCommand};
pub use value_commands::{SetColorCommand, SetGeometryCommand, SetMaterialCommand, SetValueCommand};

use command::decode;

/// Rebuild a live command from its persisted record. Targets stay as ids
/// and are resolved against the scene when the command runs.
pub fn command_from_record(record: &CommandRecord) -> Result<Box<dyn Command>, CommandError> {
    Ok(match record.kind {
        CommandKind::SetPosition => Box::new(decode::<SetPositionCommand>(record)?),
        CommandKind::SetRotation => Box::new(decode::<SetRotationCommand>(record)?),
        CommandKind::SetScale => Box::new(decode::<SetScaleCommand>(record)?),
        CommandKind::SetColor => Box::new(decode::<SetColorCommand>(record)?.labelled()),
        CommandKind::SetValue => Box::new(decode::<SetValueCommand>(record)?.labelled()),
        CommandKind::SetGeometry => Box::new(decode::<SetGeometryCommand>(record)?),
        CommandKind::SetMaterial => Box::new(decode::<SetMaterialCommand>(record)?),
        CommandKind::AddObject => Box::new(decode::<AddObjectCommand>(record)?),
        CommandKind::RemoveObject => Box::new(decode::<RemoveObjectCommand>(record)?),
        CommandKind::MoveObject => Box::new(decode::<MoveObjectCommand>(record)?),
        CommandKind::AddScript => Box::new(decode::<AddScriptCommand>(record)?),
        CommandKind::RemoveScript => Box::new(decode::<RemoveScriptCommand>(record)?),
        CommandKind::SetScriptSource => Box::new(decode::<SetScriptSourceCommand>(record)?),
        CommandKind::Multi => Box::new(MultiCommand::from_record(record)?),
    })
}
