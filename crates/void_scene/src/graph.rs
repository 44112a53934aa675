//! Arena-backed scene tree.
//!
//! Invariants:
//! - exactly one root, which has no parent;
//! - every other node has exactly one parent and appears once in that
//!   parent's `children`;
//! - no cycles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::{NodeId, SceneNode};

/// A detached node together with all of its descendants, in pre-order
/// (the subtree root first).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subtree {
    pub nodes: Vec<SceneNode>,
}

impl Subtree {
    /// A subtree made of a single, childless node.
    pub fn single(mut node: SceneNode) -> Self {
        node.parent = None;
        node.children.clear();
        Self { nodes: vec![node] }
    }

    pub fn root(&self) -> Option<&SceneNode> {
        self.nodes.first()
    }

    pub fn root_id(&self) -> Option<&NodeId> {
        self.nodes.first().map(|n| &n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct SceneGraph {
    root: NodeId,
    nodes: HashMap<NodeId, SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(SceneNode::scene("Scene"))
    }
}

impl SceneGraph {
    /// Create a graph holding only `root`. Any structure the node carried is
    /// dropped.
    pub fn new(mut root: SceneNode) -> Self {
        root.parent = None;
        root.children.clear();
        let id = root.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(id.clone(), root);
        Self { root: id, nodes }
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    pub fn root(&self) -> &SceneNode {
        &self.nodes[&self.root]
    }

    pub fn get(&self, id: &NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.nodes.get(id).and_then(|n| n.parent.as_ref())
    }

    /// Parent and index within the parent's children.
    pub fn position_of(&self, id: &NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|c| c == id)?;
        Some((parent.clone(), index))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Insert a single node under `parent`. The node's own structure is reset.
    pub fn insert(&mut self, parent: &NodeId, node: SceneNode, index: Option<usize>) -> Result<NodeId> {
        self.attach(Subtree::single(node), parent, index)
    }

    /// Clone `id` and its descendants without modifying the graph.
    pub fn snapshot(&self, id: &NodeId) -> Result<Subtree> {
        let ids = self.descendants(id)?;
        let mut nodes: Vec<SceneNode> = ids.iter().map(|i| self.nodes[i].clone()).collect();
        if let Some(root) = nodes.first_mut() {
            root.parent = None;
        }
        Ok(Subtree { nodes })
    }

    /// Remove `id` and its descendants from the graph.
    pub fn detach(&mut self, id: &NodeId) -> Result<Subtree> {
        if *id == self.root {
            return Err(SceneError::CannotDetachRoot);
        }
        let ids = self.descendants(id)?;

        if let Some(parent) = self.parent(id).cloned() {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|c| c != id);
            }
        }

        let mut nodes = Vec::with_capacity(ids.len());
        for node_id in &ids {
            if let Some(node) = self.nodes.remove(node_id) {
                nodes.push(node);
            }
        }
        if let Some(root) = nodes.first_mut() {
            root.parent = None;
        }
        Ok(Subtree { nodes })
    }

    /// Attach a detached subtree under `parent` at `index` (appended when
    /// `None`). Fails without modifying the graph if any id is already used.
    pub fn attach(&mut self, subtree: Subtree, parent: &NodeId, index: Option<usize>) -> Result<NodeId> {
        let root_id = subtree.root_id().cloned().ok_or(SceneError::EmptySubtree)?;
        let len = self
            .nodes
            .get(parent)
            .map(|p| p.children.len())
            .ok_or_else(|| SceneError::NodeNotFound(parent.clone()))?;
        let index = index.unwrap_or(len);
        if index > len {
            return Err(SceneError::IndexOutOfRange {
                parent: parent.clone(),
                index,
                len,
            });
        }
        if let Some(dup) = subtree.nodes.iter().find(|n| self.nodes.contains_key(&n.id)) {
            return Err(SceneError::DuplicateId(dup.id.clone()));
        }

        for mut node in subtree.nodes {
            if node.id == root_id {
                node.parent = Some(parent.clone());
            }
            self.nodes.insert(node.id.clone(), node);
        }
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.insert(index, root_id.clone());
        }
        Ok(root_id)
    }

    /// Re-parent `id` under `new_parent` at `index` (appended when `None`).
    /// The index is interpreted after `id` has been removed from its old parent.
    pub fn move_node(&mut self, id: &NodeId, new_parent: &NodeId, index: Option<usize>) -> Result<()> {
        if *id == self.root {
            return Err(SceneError::CannotDetachRoot);
        }
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id.clone()));
        }
        if !self.contains(new_parent) {
            return Err(SceneError::NodeNotFound(new_parent.clone()));
        }
        if self.is_ancestor(id, new_parent) {
            return Err(SceneError::WouldCreateCycle {
                node: id.clone(),
                parent: new_parent.clone(),
            });
        }

        let old_parent = self.parent(id).cloned();
        let len = self.children(new_parent).iter().filter(|c| *c != id).count();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(SceneError::IndexOutOfRange {
                parent: new_parent.clone(),
                index,
                len,
            });
        }

        if let Some(old_parent) = old_parent {
            if let Some(old) = self.nodes.get_mut(&old_parent) {
                old.children.retain(|c| c != id);
            }
        }
        if let Some(parent) = self.nodes.get_mut(new_parent) {
            parent.children.insert(index, id.clone());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(new_parent.clone());
        }
        Ok(())
    }

    /// `id` followed by all of its descendants, in pre-order.
    pub fn descendants(&self, id: &NodeId) -> Result<Vec<NodeId>> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id.clone()));
        }
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(&current).iter().rev().cloned());
            out.push(current);
        }
        Ok(out)
    }

    /// Depth-first pre-order walk from the root, children in order.
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter {
            graph: self,
            stack: vec![&self.root],
        }
    }
}

pub struct PreorderIter<'a> {
    graph: &'a SceneGraph,
    stack: Vec<&'a NodeId>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.graph.nodes.get(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, Material};

    fn sample() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::default();
        let root = graph.root_id().clone();
        let group = graph.insert(&root, SceneNode::group("Group"), None).unwrap();
        let a = graph
            .insert(&group, SceneNode::mesh("A", Geometry::default(), Material::default()), None)
            .unwrap();
        let b = graph
            .insert(&group, SceneNode::mesh("B", Geometry::default(), Material::default()), None)
            .unwrap();
        (graph, group, a, b)
    }

    #[test]
    fn test_insert_and_order() {
        let (graph, group, a, b) = sample();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.children(&group), &[a.clone(), b.clone()]);
        assert_eq!(graph.position_of(&b), Some((group, 1)));
    }

    #[test]
    fn test_preorder() {
        let (graph, ..) = sample();
        let names: Vec<_> = graph.iter_preorder().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Scene", "Group", "A", "B"]);
    }

    #[test]
    fn test_detach_and_attach_restore_position() {
        let (mut graph, group, a, b) = sample();
        let root = graph.root_id().clone();

        let subtree = graph.detach(&group).unwrap();
        assert_eq!(subtree.len(), 3);
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(&a));

        graph.attach(subtree, &root, Some(0)).unwrap();
        assert_eq!(graph.children(&group), &[a, b]);
        assert_eq!(graph.parent(&group), Some(&root));
    }

    #[test]
    fn test_attach_rejects_duplicate_ids() {
        let (mut graph, group, ..) = sample();
        let root = graph.root_id().clone();
        let copy = graph.snapshot(&group).unwrap();
        let before = graph.len();
        assert!(matches!(graph.attach(copy, &root, None), Err(SceneError::DuplicateId(_))));
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn test_cannot_detach_root() {
        let mut graph = SceneGraph::default();
        let root = graph.root_id().clone();
        assert_eq!(graph.detach(&root), Err(SceneError::CannotDetachRoot));
    }

    #[test]
    fn test_move_rejects_cycles() {
        let (mut graph, group, a, _) = sample();
        assert!(matches!(
            graph.move_node(&group, &a, None),
            Err(SceneError::WouldCreateCycle { .. })
        ));
    }

    #[test]
    fn test_move_within_same_parent() {
        let (mut graph, group, a, b) = sample();
        graph.move_node(&a, &group, Some(1)).unwrap();
        assert_eq!(graph.children(&group), &[b, a]);
    }

    #[test]
    fn test_insert_index_out_of_range() {
        let mut graph = SceneGraph::default();
        let root = graph.root_id().clone();
        let err = graph.insert(&root, SceneNode::group("G"), Some(3)).unwrap_err();
        assert!(matches!(err, SceneError::IndexOutOfRange { index: 3, len: 0, .. }));
    }
}
