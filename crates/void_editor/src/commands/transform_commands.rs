//! Transform manipulation commands (position, rotation, scale).

use std::any::Any;

use serde::{Deserialize, Serialize};
use void_scene::NodeId;

use super::command::{encode, object, object_mut};
use super::{Command, CommandError, CommandKind, CommandRecord, CommandResult, MergeKey};
use crate::core::EditorState;

#[derive(Clone, Copy, Debug)]
enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    fn attribute(self) -> &'static str {
        match self {
            Channel::Position => "position",
            Channel::Rotation => "rotation",
            Channel::Scale => "scale",
        }
    }
}

fn read(state: &EditorState, id: &NodeId, channel: Channel) -> Result<[f32; 3], CommandError> {
    let transform = &object(state, id)?.transform;
    Ok(match channel {
        Channel::Position => transform.position,
        Channel::Rotation => transform.rotation,
        Channel::Scale => transform.scale,
    })
}

fn write(state: &mut EditorState, id: &NodeId, channel: Channel, value: [f32; 3]) -> CommandResult {
    let transform = &mut object_mut(state, id)?.transform;
    match channel {
        Channel::Position => transform.position = value,
        Channel::Rotation => transform.rotation = value,
        Channel::Scale => transform.scale = value,
    }
    state.observers.notify_object_changed(id);
    Ok(())
}

macro_rules! transform_command {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $channel:ident, $old:ident, $new:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub object_uuid: NodeId,
            pub $old: [f32; 3],
            pub $new: [f32; 3],
        }

        impl $name {
            pub fn new(state: &EditorState, object_uuid: NodeId, $new: [f32; 3]) -> Result<Self, CommandError> {
                let $old = read(state, &object_uuid, Channel::$channel)?;
                Ok(Self {
                    object_uuid,
                    $old,
                    $new,
                })
            }
        }

        impl Command for $name {
            fn kind(&self) -> CommandKind {
                CommandKind::$kind
            }

            fn execute(&mut self, state: &mut EditorState) -> CommandResult {
                write(state, &self.object_uuid, Channel::$channel, self.$new)
            }

            fn undo(&mut self, state: &mut EditorState) -> CommandResult {
                write(state, &self.object_uuid, Channel::$channel, self.$old)
            }

            fn updatable(&self) -> bool {
                true
            }

            fn merge_key(&self) -> Option<MergeKey> {
                Some(MergeKey::new(&self.object_uuid, Channel::$channel.attribute()))
            }

            fn update(&mut self, other: &dyn Command) -> bool {
                match other.as_any().downcast_ref::<Self>() {
                    Some(other) => {
                        self.$new = other.$new;
                        true
                    }
                    None => false,
                }
            }

            fn to_record(&self) -> Result<CommandRecord, CommandError> {
                encode(self.kind(), self.description(), self)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

transform_command!(
    /// Command to set an object's position.
    SetPositionCommand, SetPosition, Position, old_position, new_position
);
transform_command!(
    /// Command to set an object's rotation (Euler angles, radians).
    SetRotationCommand, SetRotation, Rotation, old_rotation, new_rotation
);
transform_command!(
    /// Command to set an object's scale.
    SetScaleCommand, SetScale, Scale, old_scale, new_scale
);
