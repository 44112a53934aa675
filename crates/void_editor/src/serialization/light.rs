//! Light serializers.
//!
//! Every light record is the common object fields plus the light's own
//! parameters at the top level (`color`, `intensity`, ...).

use serde::{Deserialize, Serialize};
use void_scene::{
    AmbientLight, DirectionalLight, HemisphereLight, NodeKind, PointLight, RectAreaLight,
    SceneNode, SpotLight,
};

use super::error::SerializeError;
use super::record::{Generator, Record};
use super::serializer::{mismatch, node_record, ObjectBody, TypeSerializer};

#[derive(Serialize, Deserialize)]
struct LightBody<L> {
    #[serde(flatten)]
    object: ObjectBody,
    #[serde(flatten)]
    light: L,
}

macro_rules! light_serializer {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        pub struct $name;

        impl TypeSerializer for $name {
            type Target = SceneNode;

            fn generator(&self) -> Generator {
                Generator::$variant
            }

            fn to_json(&self, node: &SceneNode) -> Result<Record, SerializeError> {
                match &node.kind {
                    NodeKind::$variant(light) => {
                        let body = LightBody {
                            object: ObjectBody::of(node),
                            light: light.clone(),
                        };
                        node_record(node, self.generator(), &body)
                    }
                    other => Err(mismatch(self.generator(), other.type_name())),
                }
            }

            fn from_json(&self, record: &Record) -> Result<SceneNode, SerializeError> {
                let body: LightBody<$variant> = record.body()?;
                Ok(body.object.into_node(record, NodeKind::$variant(body.light)))
            }
        }
    };
}

light_serializer!(AmbientLightSerializer, AmbientLight);
light_serializer!(DirectionalLightSerializer, DirectionalLight);
light_serializer!(
    /// Sky color is `color`; ground color is `groundColor`.
    HemisphereLightSerializer,
    HemisphereLight
);
light_serializer!(PointLightSerializer, PointLight);
light_serializer!(SpotLightSerializer, SpotLight);
light_serializer!(RectAreaLightSerializer, RectAreaLight);
