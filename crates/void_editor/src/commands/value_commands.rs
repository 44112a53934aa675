//! Attribute commands: colors, scalar values, geometry and material.

use std::any::Any;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use void_scene::{Color, Geometry, Material, NodeId, NodeKind, SceneError};

use super::command::{encode, object, object_mut};
use super::{Command, CommandError, CommandKind, CommandRecord, CommandResult, MergeKey};
use crate::core::EditorState;

/// Command to set a color attribute (`color`, `emissive`, `groundColor`,
/// `background`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetColorCommand {
    pub object_uuid: NodeId,
    pub attribute_name: String,
    /// `None` only for an unset scene background.
    pub old_value: Option<Color>,
    pub new_value: Color,
    #[serde(skip)]
    label: String,
}

impl SetColorCommand {
    pub fn new(
        state: &EditorState,
        object_uuid: NodeId,
        attribute_name: impl Into<String>,
        new_value: Color,
    ) -> Result<Self, CommandError> {
        let attribute_name = attribute_name.into();
        let node = object(state, &object_uuid)?;
        let old_value = node.color(&attribute_name);
        if old_value.is_none() && attribute_name != "background" {
            return Err(SceneError::UnknownAttribute {
                attribute: attribute_name,
                kind: node.type_name(),
            }
            .into());
        }
        Ok(Self {
            object_uuid,
            attribute_name,
            old_value,
            new_value,
            label: String::new(),
        }
        .labelled())
    }

    /// Fill in the undo-menu label, e.g. "Set emissive".
    pub(crate) fn labelled(mut self) -> Self {
        self.label = format!("Set {}", self.attribute_name);
        self
    }

    fn apply(&self, state: &mut EditorState, value: Option<Color>) -> CommandResult {
        let node = object_mut(state, &self.object_uuid)?;
        match value {
            Some(color) => {
                node.set_color(&self.attribute_name, color)?;
            }
            None => match &mut node.kind {
                NodeKind::Scene(scene) if self.attribute_name == "background" => {
                    scene.background = None;
                }
                _ => {
                    return Err(CommandError::InvalidOperation(format!(
                        "cannot clear color '{}'",
                        self.attribute_name
                    )))
                }
            },
        }
        state.observers.notify_object_changed(&self.object_uuid);
        Ok(())
    }
}

impl Command for SetColorCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::SetColor
    }

    fn description(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, Some(self.new_value))
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, self.old_value)
    }

    fn updatable(&self) -> bool {
        true
    }

    fn merge_key(&self) -> Option<MergeKey> {
        Some(MergeKey::new(&self.object_uuid, self.attribute_name.as_str()))
    }

    fn update(&mut self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.new_value = other.new_value;
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

/// Command to set a scalar attribute (`name`, `visible`, `intensity`, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetValueCommand {
    pub object_uuid: NodeId,
    pub attribute_name: String,
    pub old_value: Value,
    pub new_value: Value,
    #[serde(skip)]
    label: String,
}

impl SetValueCommand {
    pub fn new(
        state: &EditorState,
        object_uuid: NodeId,
        attribute_name: impl Into<String>,
        new_value: impl Into<Value>,
    ) -> Result<Self, CommandError> {
        let attribute_name = attribute_name.into();
        let node = object(state, &object_uuid)?;
        let old_value = node.value(&attribute_name).ok_or_else(|| SceneError::UnknownAttribute {
            attribute: attribute_name.clone(),
            kind: node.type_name(),
        })?;
        Ok(Self {
            object_uuid,
            attribute_name,
            old_value,
            new_value: new_value.into(),
            label: String::new(),
        }
        .labelled())
    }

    pub(crate) fn labelled(mut self) -> Self {
        self.label = format!("Set {}", self.attribute_name);
        self
    }

    fn apply(&self, state: &mut EditorState, value: &Value) -> CommandResult {
        object_mut(state, &self.object_uuid)?.set_value(&self.attribute_name, value)?;
        state.observers.notify_object_changed(&self.object_uuid);
        // A rename shows up in the outliner.
        if self.attribute_name == "name" {
            state.observers.notify_scene_graph_changed();
        }
        Ok(())
    }
}

impl Command for SetValueCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::SetValue
    }

    fn description(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.new_value)
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.old_value)
    }

    fn updatable(&self) -> bool {
        true
    }

    fn merge_key(&self) -> Option<MergeKey> {
        Some(MergeKey::new(&self.object_uuid, self.attribute_name.as_str()))
    }

    fn update(&mut self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.new_value = other.new_value.clone();
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

/// Command to replace a mesh's geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetGeometryCommand {
    pub object_uuid: NodeId,
    pub old_geometry: Geometry,
    pub new_geometry: Geometry,
}

impl SetGeometryCommand {
    pub fn new(state: &EditorState, object_uuid: NodeId, new_geometry: Geometry) -> Result<Self, CommandError> {
        let node = object(state, &object_uuid)?;
        let old_geometry = node.geometry().cloned().ok_or_else(|| SceneError::UnknownAttribute {
            attribute: "geometry".to_string(),
            kind: node.type_name(),
        })?;
        Ok(Self {
            object_uuid,
            old_geometry,
            new_geometry,
        })
    }

    fn apply(&self, state: &mut EditorState, geometry: &Geometry) -> CommandResult {
        object_mut(state, &self.object_uuid)?.set_geometry(geometry.clone())?;
        state.observers.notify_object_changed(&self.object_uuid);
        Ok(())
    }
}

impl Command for SetGeometryCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::SetGeometry
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.new_geometry)
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.old_geometry)
    }

    fn updatable(&self) -> bool {
        true
    }

    fn merge_key(&self) -> Option<MergeKey> {
        Some(MergeKey::new(&self.object_uuid, "geometry"))
    }

    fn update(&mut self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.new_geometry = other.new_geometry.clone();
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

/// Command to replace the material of a mesh or sprite.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMaterialCommand {
    pub object_uuid: NodeId,
    pub old_material: Material,
    pub new_material: Material,
}

impl SetMaterialCommand {
    pub fn new(state: &EditorState, object_uuid: NodeId, new_material: Material) -> Result<Self, CommandError> {
        let node = object(state, &object_uuid)?;
        let old_material = node.material().cloned().ok_or_else(|| SceneError::UnknownAttribute {
            attribute: "material".to_string(),
            kind: node.type_name(),
        })?;
        Ok(Self {
            object_uuid,
            old_material,
            new_material,
        })
    }

    fn apply(&self, state: &mut EditorState, material: &Material) -> CommandResult {
        object_mut(state, &self.object_uuid)?.set_material(material.clone())?;
        state.observers.notify_object_changed(&self.object_uuid);
        Ok(())
    }
}

impl Command for SetMaterialCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::SetMaterial
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.new_material)
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.old_material)
    }

    fn updatable(&self) -> bool {
        true
    }

    fn merge_key(&self) -> Option<MergeKey> {
        Some(MergeKey::new(&self.object_uuid, "material"))
    }

    fn update(&mut self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.new_material = other.new_material.clone();
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
