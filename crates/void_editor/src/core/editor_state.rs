//! Central editor state - single source of truth.
//!
//! All editor data flows through `EditorState`. Modifications should
//! go through the command system for undo/redo support.

use void_scene::{AppOptions, Camera, NodeId, RendererConfig, SceneGraph, SceneNode, Script};

use super::observers::ChangeObservers;

/// Everything a session persists, plus the observers watching it.
#[derive(Debug, Default)]
pub struct EditorState {
    pub scene: SceneGraph,
    pub camera: Camera,
    pub options: AppOptions,
    pub renderer: RendererConfig,
    /// Document scripts, in display order.
    pub scripts: Vec<Script>,
    pub observers: ChangeObservers,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_by_id(&self, id: &NodeId) -> Option<&SceneNode> {
        self.scene.get(id)
    }

    pub fn object_by_id_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode> {
        self.scene.get_mut(id)
    }

    pub fn script(&self, id: &NodeId) -> Option<&Script> {
        self.scripts.iter().find(|s| s.id == *id)
    }

    pub fn script_mut(&mut self, id: &NodeId) -> Option<&mut Script> {
        self.scripts.iter_mut().find(|s| s.id == *id)
    }

    pub fn script_index(&self, id: &NodeId) -> Option<usize> {
        self.scripts.iter().position(|s| s.id == *id)
    }

    /// Insert a script at `index` (clamped), or append when `None`.
    pub fn add_script(&mut self, script: Script, index: Option<usize>) -> usize {
        let index = index.unwrap_or(self.scripts.len()).min(self.scripts.len());
        self.scripts.insert(index, script);
        index
    }

    /// Remove a script, returning it with the index it occupied.
    pub fn remove_script(&mut self, id: &NodeId) -> Option<(Script, usize)> {
        let index = self.script_index(id)?;
        Some((self.scripts.remove(index), index))
    }

    /// Reset to an empty scene, keeping subscribers.
    pub fn new_scene(&mut self) {
        self.scene = SceneGraph::default();
        self.camera = Camera::default();
        self.options = AppOptions::default();
        self.renderer = RendererConfig::default();
        self.scripts.clear();
        self.observers.notify_scene_graph_changed();
    }
}
