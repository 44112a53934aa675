//! The [`TypeSerializer`] trait and the fields every scene node shares.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use void_scene::{NodeKind, SceneNode, Transform};

use super::error::SerializeError;
use super::record::{Generator, Record};

/// Converts one variant between its live form and a [`Record`].
///
/// `to_json` only reads the instance. `from_json` builds a complete instance
/// from the record's own fields; children are linked by the converter.
pub trait TypeSerializer {
    type Target;

    fn generator(&self) -> Generator;

    fn to_json(&self, target: &Self::Target) -> Result<Record, SerializeError>;

    fn from_json(&self, record: &Record) -> Result<Self::Target, SerializeError>;
}

fn default_true() -> bool {
    true
}

/// Fields common to every scene-node record.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectBody {
    pub name: String,
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub cast_shadow: bool,
    #[serde(default)]
    pub receive_shadow: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

impl ObjectBody {
    pub fn of(node: &SceneNode) -> Self {
        Self {
            name: node.name.clone(),
            transform: node.transform,
            visible: node.visible,
            cast_shadow: node.cast_shadow,
            receive_shadow: node.receive_shadow,
            user_data: node.user_data.clone(),
        }
    }

    /// Build a node with `kind` and these common fields.
    pub fn into_node(self, record: &Record, kind: NodeKind) -> SceneNode {
        let mut node = SceneNode::new(self.name, kind).with_id(record.id.clone());
        node.transform = self.transform;
        node.visible = self.visible;
        node.cast_shadow = self.cast_shadow;
        node.receive_shadow = self.receive_shadow;
        node.user_data = self.user_data;
        node
    }
}

/// Record for a scene node, children included.
pub(crate) fn node_record<T: Serialize>(
    node: &SceneNode,
    generator: Generator,
    body: &T,
) -> Result<Record, SerializeError> {
    Record::new(
        node.id.clone(),
        generator,
        node.type_name(),
        node.children().to_vec(),
        body,
    )
}

pub(crate) fn mismatch(generator: Generator, found: &str) -> SerializeError {
    SerializeError::VariantMismatch {
        serializer: generator.as_str(),
        found: found.to_string(),
    }
}
