//! Flat record model shared by every serializer.
//!
//! A record is one JSON object: `id`, `metadata { generator, type }`, an
//! optional `children` id list and whatever fields the generator writes.
//! A document is a flat `Vec<Record>`; the tree is rebuilt from the ids.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use void_scene::{NodeId, SERVER_KEY};

use super::error::SerializeError;

/// Name of the serializer that produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Generator {
    Options,
    PerspectiveCamera,
    OrthographicCamera,
    WebGLRenderer,
    Script,
    Scene,
    Group,
    Mesh,
    Sprite,
    AmbientLight,
    DirectionalLight,
    HemisphereLight,
    PointLight,
    SpotLight,
    RectAreaLight,
    ServerObject,
}

impl Generator {
    pub const ALL: [Generator; 16] = [
        Generator::Options,
        Generator::PerspectiveCamera,
        Generator::OrthographicCamera,
        Generator::WebGLRenderer,
        Generator::Script,
        Generator::Scene,
        Generator::Group,
        Generator::Mesh,
        Generator::Sprite,
        Generator::AmbientLight,
        Generator::DirectionalLight,
        Generator::HemisphereLight,
        Generator::PointLight,
        Generator::SpotLight,
        Generator::RectAreaLight,
        Generator::ServerObject,
    ];

    /// Wire name written to `metadata.generator`.
    pub fn as_str(self) -> &'static str {
        match self {
            Generator::Options => "OptionsSerializer",
            Generator::PerspectiveCamera => "PerspectiveCameraSerializer",
            Generator::OrthographicCamera => "OrthographicCameraSerializer",
            Generator::WebGLRenderer => "WebGLRendererSerializer",
            Generator::Script => "ScriptSerializer",
            Generator::Scene => "SceneSerializer",
            Generator::Group => "GroupSerializer",
            Generator::Mesh => "MeshSerializer",
            Generator::Sprite => "SpriteSerializer",
            Generator::AmbientLight => "AmbientLightSerializer",
            Generator::DirectionalLight => "DirectionalLightSerializer",
            Generator::HemisphereLight => "HemisphereLightSerializer",
            Generator::PointLight => "PointLightSerializer",
            Generator::SpotLight => "SpotLightSerializer",
            Generator::RectAreaLight => "RectAreaLightSerializer",
            Generator::ServerObject => "ServerObject",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == name)
    }

    /// Whether records of this generator belong in the scene tree.
    pub fn is_scene_node(self) -> bool {
        !matches!(
            self,
            Generator::Options
                | Generator::PerspectiveCamera
                | Generator::OrthographicCamera
                | Generator::WebGLRenderer
                | Generator::Script
        )
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `metadata` block of a record. Unknown generator names are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub generator: String,
    #[serde(default, rename = "type")]
    pub type_name: String,
}

/// One persisted object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: NodeId,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record whose variant fields are `body` serialized as an object.
    pub fn new<T: Serialize>(
        id: NodeId,
        generator: Generator,
        type_name: &str,
        children: Vec<NodeId>,
        body: &T,
    ) -> Result<Self, SerializeError> {
        let malformed = |message: String| SerializeError::Malformed {
            generator: generator.as_str().to_string(),
            id: id.to_string(),
            message,
        };
        let fields = match serde_json::to_value(body).map_err(|e| malformed(e.to_string()))? {
            Value::Object(map) => map,
            other => return Err(malformed(format!("expected an object body, got {other}"))),
        };
        Ok(Self {
            id,
            metadata: Metadata {
                generator: generator.as_str().to_string(),
                type_name: type_name.to_string(),
            },
            children,
            fields,
        })
    }

    pub fn generator(&self) -> Option<Generator> {
        Generator::parse(&self.metadata.generator)
    }

    /// Decode the variant fields.
    pub fn body<T: DeserializeOwned>(&self) -> Result<T, SerializeError> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            SerializeError::Malformed {
                generator: self.metadata.generator.clone(),
                id: self.id.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Whether the record points at a server-hosted asset.
    pub fn is_server_object(&self) -> bool {
        self.generator() == Some(Generator::ServerObject)
            || self
                .fields
                .get("userData")
                .and_then(|data| data.get(SERVER_KEY))
                == Some(&Value::Bool(true))
    }
}

/// Recoverable issue met during a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertWarning {
    #[error("No {0} record; section skipped")]
    MissingSection(&'static str),

    #[error("No serializer for {type_name} {id}; node skipped")]
    NoSerializer { id: NodeId, type_name: String },

    #[error("Unknown generator '{generator}' on record {id}; record skipped")]
    UnknownGenerator { id: NodeId, generator: String },

    #[error("Record {id} ({generator}) is not a scene node; skipped")]
    NotASceneNode { id: NodeId, generator: Generator },

    #[error("Record {parent} references missing child {child}")]
    MissingChild { parent: NodeId, child: NodeId },

    #[error("Record {id} is referenced more than once; later reference ignored")]
    DuplicateVisit { id: NodeId },

    #[error("Server object {id} could not be loaded: {message}")]
    ServerObjectFailed { id: NodeId, message: String },
}

/// A conversion result together with the warnings it produced.
#[derive(Debug, Clone)]
pub struct Converted<T> {
    pub value: T,
    pub warnings: Vec<ConvertWarning>,
}

impl<T> Converted<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, warning: ConvertWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
