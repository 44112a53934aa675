//! Scene nodes and their variant payloads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SceneError};
use crate::light::{
    AmbientLight, DirectionalLight, HemisphereLight, PointLight, RectAreaLight, SpotLight,
};
use crate::{Color, Geometry, Material, NodeId, Projection, Transform};

/// User-data key marking a node whose content lives on the asset server.
pub const SERVER_KEY: &str = "Server";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneProps {
    pub background: Option<Color>,
    pub fog: Option<Fog>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshProps {
    pub geometry: Geometry,
    pub material: Material,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteProps {
    pub material: Material,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraProps {
    pub projection: Projection,
}

/// What kind of resource a server-owned node refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerAssetKind {
    Model,
    Texture,
}

/// Reference to an asset hosted by the asset server, stored in a node's
/// user data under the `ID`, `Url` and `Type` keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAssetRef {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "Type")]
    pub kind: ServerAssetKind,
}

/// Data materialized from the asset server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ServerPayload {
    Model {
        geometry: Geometry,
        material: Material,
    },
    Texture {
        width: u32,
        height: u32,
        /// RGBA8 pixels. Not persisted; refetched on load.
        #[serde(skip)]
        pixels: Arc<Vec<u8>>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerObject {
    /// `None` until the asset has been fetched.
    pub payload: Option<ServerPayload>,
}

/// Variant payload of a scene node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Scene(SceneProps),
    Group,
    Mesh(MeshProps),
    Sprite(SpriteProps),
    AmbientLight(AmbientLight),
    DirectionalLight(DirectionalLight),
    HemisphereLight(HemisphereLight),
    PointLight(PointLight),
    SpotLight(SpotLight),
    RectAreaLight(RectAreaLight),
    ServerObject(ServerObject),
    /// A camera placed in the scene tree (as opposed to the editor camera).
    Camera(CameraProps),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Scene(_) => "Scene",
            NodeKind::Group => "Group",
            NodeKind::Mesh(_) => "Mesh",
            NodeKind::Sprite(_) => "Sprite",
            NodeKind::AmbientLight(_) => "AmbientLight",
            NodeKind::DirectionalLight(_) => "DirectionalLight",
            NodeKind::HemisphereLight(_) => "HemisphereLight",
            NodeKind::PointLight(_) => "PointLight",
            NodeKind::SpotLight(_) => "SpotLight",
            NodeKind::RectAreaLight(_) => "RectAreaLight",
            NodeKind::ServerObject(_) => "ServerObject",
            NodeKind::Camera(props) => props.projection.type_name(),
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(
            self,
            NodeKind::AmbientLight(_)
                | NodeKind::DirectionalLight(_)
                | NodeKind::HemisphereLight(_)
                | NodeKind::PointLight(_)
                | NodeKind::SpotLight(_)
                | NodeKind::RectAreaLight(_)
        )
    }
}

fn default_true() -> bool {
    true
}

/// A node of the scene tree.
///
/// Structure (`parent`, `children`) is owned by [`crate::SceneGraph`]; a
/// node outside a graph carries whatever structure it was detached with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub cast_shadow: bool,
    #[serde(default)]
    pub receive_shadow: bool,
    #[serde(default)]
    pub user_data: Map<String, Value>,
    #[serde(default)]
    pub(crate) parent: Option<NodeId>,
    #[serde(default)]
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            transform: Transform::new(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            user_data: Map::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn scene(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Scene(SceneProps::default()))
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh(MeshProps { geometry, material }))
    }

    pub fn sprite(name: impl Into<String>, material: Material) -> Self {
        Self::new(name, NodeKind::Sprite(SpriteProps { material }))
    }

    /// A server-owned node that has not been fetched yet.
    pub fn server_object(name: impl Into<String>, asset: &ServerAssetRef) -> Self {
        let mut node = Self::new(name, NodeKind::ServerObject(ServerObject::default()));
        node.set_server_asset(asset);
        node
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_user_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user_data.insert(key.into(), value.into());
        self
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Whether user data marks this node as owned by the asset server.
    pub fn is_server_owned(&self) -> bool {
        self.user_data.get(SERVER_KEY) == Some(&Value::Bool(true))
    }

    /// Mark the node as server-owned and record where its asset lives.
    pub fn set_server_asset(&mut self, asset: &ServerAssetRef) {
        self.user_data.insert(SERVER_KEY.to_string(), Value::Bool(true));
        self.user_data.insert("ID".to_string(), Value::from(asset.id.clone()));
        self.user_data.insert("Url".to_string(), Value::from(asset.url.clone()));
        if let Ok(kind) = serde_json::to_value(asset.kind) {
            self.user_data.insert("Type".to_string(), kind);
        }
        self.user_data.insert("Name".to_string(), Value::from(self.name.clone()));
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&mesh.geometry),
            _ => None,
        }
    }

    /// Replace the mesh geometry, returning the previous one.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<Geometry> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Ok(std::mem::replace(&mut mesh.geometry, geometry)),
            other => Err(SceneError::UnknownAttribute {
                attribute: "geometry".to_string(),
                kind: other.type_name(),
            }),
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&mesh.material),
            NodeKind::Sprite(sprite) => Some(&sprite.material),
            _ => None,
        }
    }

    /// Replace the material, returning the previous one.
    pub fn set_material(&mut self, material: Material) -> Result<Material> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Ok(std::mem::replace(&mut mesh.material, material)),
            NodeKind::Sprite(sprite) => Ok(std::mem::replace(&mut sprite.material, material)),
            other => Err(SceneError::UnknownAttribute {
                attribute: "material".to_string(),
                kind: other.type_name(),
            }),
        }
    }

    /// Read a color attribute (`color`, `groundColor`, `emissive`, `background`).
    pub fn color(&self, attribute: &str) -> Option<Color> {
        match (&self.kind, attribute) {
            (NodeKind::Scene(scene), "background") => scene.background,
            (NodeKind::Mesh(mesh), "emissive") => Some(mesh.material.emissive),
            (NodeKind::HemisphereLight(light), "groundColor") => Some(light.ground_color),
            (_, "color") => self.color_ref().copied(),
            _ => None,
        }
    }

    /// Write a color attribute, returning the previous value.
    pub fn set_color(&mut self, attribute: &str, color: Color) -> Result<Option<Color>> {
        let kind = self.type_name();
        let unknown = || SceneError::UnknownAttribute {
            attribute: attribute.to_string(),
            kind,
        };
        match attribute {
            "color" => {
                let slot = self.color_mut().ok_or_else(unknown)?;
                Ok(Some(std::mem::replace(slot, color)))
            }
            "background" => match &mut self.kind {
                NodeKind::Scene(scene) => Ok(scene.background.replace(color)),
                _ => Err(unknown()),
            },
            "emissive" => match &mut self.kind {
                NodeKind::Mesh(mesh) => Ok(Some(std::mem::replace(&mut mesh.material.emissive, color))),
                _ => Err(unknown()),
            },
            "groundColor" => match &mut self.kind {
                NodeKind::HemisphereLight(light) => {
                    Ok(Some(std::mem::replace(&mut light.ground_color, color)))
                }
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }

    fn color_ref(&self) -> Option<&Color> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(&mesh.material.color),
            NodeKind::Sprite(sprite) => Some(&sprite.material.color),
            NodeKind::AmbientLight(l) => Some(&l.color),
            NodeKind::DirectionalLight(l) => Some(&l.color),
            NodeKind::HemisphereLight(l) => Some(&l.color),
            NodeKind::PointLight(l) => Some(&l.color),
            NodeKind::SpotLight(l) => Some(&l.color),
            NodeKind::RectAreaLight(l) => Some(&l.color),
            _ => None,
        }
    }

    fn color_mut(&mut self) -> Option<&mut Color> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(&mut mesh.material.color),
            NodeKind::Sprite(sprite) => Some(&mut sprite.material.color),
            NodeKind::AmbientLight(l) => Some(&mut l.color),
            NodeKind::DirectionalLight(l) => Some(&mut l.color),
            NodeKind::HemisphereLight(l) => Some(&mut l.color),
            NodeKind::PointLight(l) => Some(&mut l.color),
            NodeKind::SpotLight(l) => Some(&mut l.color),
            NodeKind::RectAreaLight(l) => Some(&mut l.color),
            _ => None,
        }
    }

    /// Read a scalar attribute as JSON.
    pub fn value(&self, attribute: &str) -> Option<Value> {
        match attribute {
            "name" => Some(Value::from(self.name.clone())),
            "visible" => Some(Value::Bool(self.visible)),
            "castShadow" => Some(Value::Bool(self.cast_shadow)),
            "receiveShadow" => Some(Value::Bool(self.receive_shadow)),
            _ => self.scalar_ref(attribute).map(|v| Value::from(*v)),
        }
    }

    /// Write a scalar attribute from JSON, returning the previous value.
    pub fn set_value(&mut self, attribute: &str, value: &Value) -> Result<Value> {
        let mismatch = |expected| SceneError::TypeMismatch {
            attribute: attribute.to_string(),
            expected,
        };
        let previous = match attribute {
            "name" => {
                let name = value.as_str().ok_or_else(|| mismatch("string"))?;
                Value::from(std::mem::replace(&mut self.name, name.to_string()))
            }
            "visible" | "castShadow" | "receiveShadow" => {
                let flag = value.as_bool().ok_or_else(|| mismatch("boolean"))?;
                let slot = match attribute {
                    "visible" => &mut self.visible,
                    "castShadow" => &mut self.cast_shadow,
                    _ => &mut self.receive_shadow,
                };
                Value::Bool(std::mem::replace(slot, flag))
            }
            _ => {
                let kind = self.type_name();
                let number = value.as_f64().ok_or_else(|| mismatch("number"))? as f32;
                let slot = self.scalar_mut(attribute).ok_or_else(|| SceneError::UnknownAttribute {
                    attribute: attribute.to_string(),
                    kind,
                })?;
                Value::from(std::mem::replace(slot, number))
            }
        };
        Ok(previous)
    }

    fn scalar_ref(&self, attribute: &str) -> Option<&f32> {
        match (&self.kind, attribute) {
            (NodeKind::AmbientLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::DirectionalLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::HemisphereLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::PointLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::PointLight(l), "distance") => Some(&l.distance),
            (NodeKind::PointLight(l), "decay") => Some(&l.decay),
            (NodeKind::SpotLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::SpotLight(l), "distance") => Some(&l.distance),
            (NodeKind::SpotLight(l), "angle") => Some(&l.angle),
            (NodeKind::SpotLight(l), "penumbra") => Some(&l.penumbra),
            (NodeKind::SpotLight(l), "decay") => Some(&l.decay),
            (NodeKind::RectAreaLight(l), "intensity") => Some(&l.intensity),
            (NodeKind::RectAreaLight(l), "width") => Some(&l.width),
            (NodeKind::RectAreaLight(l), "height") => Some(&l.height),
            _ => None,
        }
    }

    fn scalar_mut(&mut self, attribute: &str) -> Option<&mut f32> {
        match (&mut self.kind, attribute) {
            (NodeKind::AmbientLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::DirectionalLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::HemisphereLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::PointLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::PointLight(l), "distance") => Some(&mut l.distance),
            (NodeKind::PointLight(l), "decay") => Some(&mut l.decay),
            (NodeKind::SpotLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::SpotLight(l), "distance") => Some(&mut l.distance),
            (NodeKind::SpotLight(l), "angle") => Some(&mut l.angle),
            (NodeKind::SpotLight(l), "penumbra") => Some(&mut l.penumbra),
            (NodeKind::SpotLight(l), "decay") => Some(&mut l.decay),
            (NodeKind::RectAreaLight(l), "intensity") => Some(&mut l.intensity),
            (NodeKind::RectAreaLight(l), "width") => Some(&mut l.width),
            (NodeKind::RectAreaLight(l), "height") => Some(&mut l.height),
            _ => None,
        }
    }
}
