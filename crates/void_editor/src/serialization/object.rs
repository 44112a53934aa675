//! Serializers for the structural node variants: scene, group, mesh, sprite.

use serde::{Deserialize, Serialize};
use void_scene::{
    Color, Fog, Geometry, Material, MeshProps, NodeKind, SceneNode, SceneProps, SpriteProps,
};

use super::error::SerializeError;
use super::record::{Generator, Record};
use super::serializer::{mismatch, node_record, ObjectBody, TypeSerializer};

#[derive(Serialize, Deserialize)]
struct SceneBody {
    #[serde(flatten)]
    object: ObjectBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fog: Option<Fog>,
}

pub struct SceneSerializer;

impl TypeSerializer for SceneSerializer {
    type Target = SceneNode;

    fn generator(&self) -> Generator {
        Generator::Scene
    }

    fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
        let NodeKind::Scene(props) = &node.kind else {
            return Err(mismatch(self.generator(), node.type_name()));
        };
        let body = SceneBody {
            object: ObjectBody::of(node),
            background: props.background,
            fog: props.fog.clone(),
        };
        node_record(node, self.generator(), &body)
    }

    fn from_json(&self, record: &Record) -> Result<SceneNode, SerializeError> {
        let body: SceneBody = record.body()?;
        let props = SceneProps {
            background: body.background,
            fog: body.fog,
        };
        Ok(body.object.into_node(record, NodeKind::Scene(props)))
    }
}

pub struct GroupSerializer;

impl TypeSerializer for GroupSerializer {
    type Target = SceneNode;

    fn generator(&self) -> Generator {
        Generator::Group
    }

    fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
        match node.kind {
            NodeKind::Group => node_record(node, self.generator(), &ObjectBody::of(node)),
            _ => Err(mismatch(self.generator(), node.type_name())),
        }
    }

    fn from_json(&self, record: &Record) -> Result<SceneNode, SerializeError> {
        let body: ObjectBody = record.body()?;
        Ok(body.into_node(record, NodeKind::Group))
    }
}

#[derive(Serialize, Deserialize)]
struct MeshBody {
    #[serde(flatten)]
    object: ObjectBody,
    geometry: Geometry,
    #[serde(default)]
    material: Material,
}

pub struct MeshSerializer;

impl TypeSerializer for MeshSerializer {
    type Target = SceneNode;

    fn generator(&self) -> Generator {
        Generator::Mesh
    }

    fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
        let NodeKind::Mesh(mesh) = &node.kind else {
            return Err(mismatch(self.generator(), node.type_name()));
        };
        let body = MeshBody {
            object: ObjectBody::of(node),
            geometry: mesh.geometry.clone(),
            material: mesh.material.clone(),
        };
        node_record(node, self.generator(), &body)
    }

    fn from_json(&self, record: &Record) -> Result<SceneNode, SerializeError> {
        let body: MeshBody = record.body()?;
        let props = MeshProps {
            geometry: body.geometry,
            material: body.material,
        };
        Ok(body.object.into_node(record, NodeKind::Mesh(props)))
    }
}

#[derive(Serialize, Deserialize)]
struct SpriteBody {
    #[serde(flatten)]
    object: ObjectBody,
    #[serde(default)]
    material: Material,
}

pub struct SpriteSerializer;

impl TypeSerializer for SpriteSerializer {
    type Target = SceneNode;

    fn generator(&self) -> Generator {
        Generator::Sprite
    }

    fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
        let NodeKind::Sprite(sprite) = &node.kind else {
            return Err(mismatch(self.generator(), node.type_name()));
        };
        let body = SpriteBody {
            object: ObjectBody::of(node),
            material: sprite.material.clone(),
        };
        node_record(node, self.generator(), &body)
    }

    fn from_json(&self, record: &Record) -> Result<SceneNode, SerializeError> {
        let body: SpriteBody = record.body()?;
        let props = SpriteProps {
            material: body.material,
        };
        Ok(body.object.into_node(record, NodeKind::Sprite(props)))
    }
}
