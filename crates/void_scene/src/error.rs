//! Error types for scene graph operations

use thiserror::Error;

use crate::NodeId;

/// Scene graph errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("The root node cannot be detached or moved")]
    CannotDetachRoot,

    #[error("Moving {node} under {parent} would create a cycle")]
    WouldCreateCycle { node: NodeId, parent: NodeId },

    #[error("Child index {index} out of range for {parent} ({len} children)")]
    IndexOutOfRange { parent: NodeId, index: usize, len: usize },

    #[error("Attribute '{attribute}' is not supported on {kind}")]
    UnknownAttribute { attribute: String, kind: &'static str },

    #[error("Attribute '{attribute}' expects a {expected} value")]
    TypeMismatch { attribute: String, expected: &'static str },

    #[error("Subtree contains no nodes")]
    EmptySubtree,
}

/// Result type for scene graph operations
pub type Result<T> = std::result::Result<T, SceneError>;
