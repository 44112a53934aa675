//! Structural commands: add, remove and re-parent objects.
//!
//! Add and remove carry a full [`Subtree`] snapshot, so a persisted history
//! can restore an object even when it is absent from the reloaded scene.

use std::any::Any;

use serde::{Deserialize, Serialize};
use void_scene::{NodeId, SceneError, SceneNode, Subtree};

use super::command::{encode, object};
use super::{Command, CommandError, CommandKind, CommandRecord, CommandResult};
use crate::core::EditorState;

/// Command to add an object (and its descendants) under a parent.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddObjectCommand {
    pub parent_uuid: NodeId,
    /// Position among the parent's children; appended when `None`.
    pub index: Option<usize>,
    pub subtree: Subtree,
}

impl AddObjectCommand {
    pub fn new(state: &EditorState, parent_uuid: NodeId, node: SceneNode) -> Result<Self, CommandError> {
        Self::with_subtree(state, parent_uuid, Subtree::single(node), None)
    }

    pub fn with_subtree(
        state: &EditorState,
        parent_uuid: NodeId,
        subtree: Subtree,
        index: Option<usize>,
    ) -> Result<Self, CommandError> {
        object(state, &parent_uuid)?;
        if subtree.is_empty() {
            return Err(SceneError::EmptySubtree.into());
        }
        Ok(Self {
            parent_uuid,
            index,
            subtree,
        })
    }

    pub fn object_uuid(&self) -> Option<&NodeId> {
        self.subtree.root_id()
    }
}

impl Command for AddObjectCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::AddObject
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        state
            .scene
            .attach(self.subtree.clone(), &self.parent_uuid, self.index)?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        let id = self
            .subtree
            .root_id()
            .cloned()
            .ok_or(SceneError::EmptySubtree)?;
        self.subtree = state.scene.detach(&id)?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to remove an object and its descendants.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveObjectCommand {
    pub object_uuid: NodeId,
    pub parent_uuid: NodeId,
    pub index: usize,
    pub subtree: Subtree,
}

impl RemoveObjectCommand {
    pub fn new(state: &EditorState, object_uuid: NodeId) -> Result<Self, CommandError> {
        object(state, &object_uuid)?;
        let (parent_uuid, index) = state
            .scene
            .position_of(&object_uuid)
            .ok_or(SceneError::CannotDetachRoot)?;
        let subtree = state.scene.snapshot(&object_uuid)?;
        Ok(Self {
            object_uuid,
            parent_uuid,
            index,
            subtree,
        })
    }
}

impl Command for RemoveObjectCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::RemoveObject
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.subtree = state.scene.detach(&self.object_uuid)?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        state
            .scene
            .attach(self.subtree.clone(), &self.parent_uuid, Some(self.index))?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to re-parent or reorder an object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveObjectCommand {
    pub object_uuid: NodeId,
    pub old_parent_uuid: NodeId,
    pub old_index: usize,
    pub new_parent_uuid: NodeId,
    /// Index after the object has left its old parent; appended when `None`.
    pub new_index: Option<usize>,
}

impl MoveObjectCommand {
    pub fn new(
        state: &EditorState,
        object_uuid: NodeId,
        new_parent_uuid: NodeId,
        new_index: Option<usize>,
    ) -> Result<Self, CommandError> {
        object(state, &object_uuid)?;
        object(state, &new_parent_uuid)?;
        let (old_parent_uuid, old_index) = state
            .scene
            .position_of(&object_uuid)
            .ok_or(SceneError::CannotDetachRoot)?;
        if state.scene.is_ancestor(&object_uuid, &new_parent_uuid) {
            return Err(SceneError::WouldCreateCycle {
                node: object_uuid,
                parent: new_parent_uuid,
            }
            .into());
        }
        Ok(Self {
            object_uuid,
            old_parent_uuid,
            old_index,
            new_parent_uuid,
            new_index,
        })
    }
}

impl Command for MoveObjectCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::MoveObject
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        state
            .scene
            .move_node(&self.object_uuid, &self.new_parent_uuid, self.new_index)?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        state
            .scene
            .move_node(&self.object_uuid, &self.old_parent_uuid, Some(self.old_index))?;
        state.observers.notify_scene_graph_changed();
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(state: &EditorState, parent: &NodeId) -> Vec<String> {
        state
            .scene
            .children(parent)
            .iter()
            .map(|id| state.object_by_id(id).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_add_then_undo() {
        let mut state = EditorState::new();
        let root = state.scene.root_id().clone();
        let mut cmd = AddObjectCommand::new(&state, root.clone(), SceneNode::group("G")).unwrap();
        let id = cmd.object_uuid().cloned().unwrap();

        cmd.execute(&mut state).unwrap();
        assert!(state.object_by_id(&id).is_some());
        cmd.undo(&mut state).unwrap();
        assert!(state.object_by_id(&id).is_none());
        cmd.execute(&mut state).unwrap();
        assert_eq!(names(&state, &root), vec!["G"]);
    }

    #[test]
    fn test_remove_restores_subtree_and_order() {
        let mut state = EditorState::new();
        let root = state.scene.root_id().clone();
        let a = state.scene.insert(&root, SceneNode::group("A"), None).unwrap();
        state.scene.insert(&root, SceneNode::group("B"), None).unwrap();
        let child = state.scene.insert(&a, SceneNode::group("A1"), None).unwrap();

        let mut cmd = RemoveObjectCommand::new(&state, a.clone()).unwrap();
        cmd.execute(&mut state).unwrap();
        assert_eq!(names(&state, &root), vec!["B"]);
        assert!(state.object_by_id(&child).is_none());

        cmd.undo(&mut state).unwrap();
        assert_eq!(names(&state, &root), vec!["A", "B"]);
        assert_eq!(state.scene.parent(&child), Some(&a));
    }

    #[test]
    fn test_remove_root_rejected() {
        let state = EditorState::new();
        let root = state.scene.root_id().clone();
        assert!(matches!(
            RemoveObjectCommand::new(&state, root),
            Err(CommandError::Scene(SceneError::CannotDetachRoot))
        ));
    }

    #[test]
    fn test_move_and_undo() {
        let mut state = EditorState::new();
        let root = state.scene.root_id().clone();
        let a = state.scene.insert(&root, SceneNode::group("A"), None).unwrap();
        let b = state.scene.insert(&root, SceneNode::group("B"), None).unwrap();
        let c = state.scene.insert(&root, SceneNode::group("C"), None).unwrap();

        let mut cmd = MoveObjectCommand::new(&state, a.clone(), b.clone(), None).unwrap();
        cmd.execute(&mut state).unwrap();
        assert_eq!(names(&state, &root), vec!["B", "C"]);
        assert_eq!(state.scene.parent(&a), Some(&b));

        cmd.undo(&mut state).unwrap();
        assert_eq!(names(&state, &root), vec!["A", "B", "C"]);

        assert!(MoveObjectCommand::new(&state, root.clone(), c, None).is_err());
    }

    #[test]
    fn test_move_under_descendant_rejected() {
        let mut state = EditorState::new();
        let root = state.scene.root_id().clone();
        let a = state.scene.insert(&root, SceneNode::group("A"), None).unwrap();
        let a1 = state.scene.insert(&a, SceneNode::group("A1"), None).unwrap();
        assert!(matches!(
            MoveObjectCommand::new(&state, a, a1, None),
            Err(CommandError::Scene(SceneError::WouldCreateCycle { .. }))
        ));
    }
}
