//! Dispatch between node variants, generators and serializers.
//!
//! All three tables are exhaustive matches: adding a `NodeKind` or a
//! `Generator` fails to compile until it is wired here.

use void_scene::{Camera, NodeKind, Projection, SceneNode};

use super::camera::{OrthographicCameraSerializer, PerspectiveCameraSerializer};
use super::error::SerializeError;
use super::light::{
    AmbientLightSerializer, DirectionalLightSerializer, HemisphereLightSerializer,
    PointLightSerializer, RectAreaLightSerializer, SpotLightSerializer,
};
use super::object::{GroupSerializer, MeshSerializer, SceneSerializer, SpriteSerializer};
use super::record::{Generator, Record};
use super::serializer::{mismatch, TypeSerializer};

/// Generator responsible for a node variant, or `None` when the variant is
/// not persisted.
pub fn generator_for(kind: &NodeKind) -> Option<Generator> {
    match kind {
        NodeKind::Scene(_) => Some(Generator::Scene),
        NodeKind::Group => Some(Generator::Group),
        NodeKind::Mesh(_) => Some(Generator::Mesh),
        NodeKind::Sprite(_) => Some(Generator::Sprite),
        NodeKind::AmbientLight(_) => Some(Generator::AmbientLight),
        NodeKind::DirectionalLight(_) => Some(Generator::DirectionalLight),
        NodeKind::HemisphereLight(_) => Some(Generator::HemisphereLight),
        NodeKind::PointLight(_) => Some(Generator::PointLight),
        NodeKind::SpotLight(_) => Some(Generator::SpotLight),
        NodeKind::RectAreaLight(_) => Some(Generator::RectAreaLight),
        NodeKind::ServerObject(_) => Some(Generator::ServerObject),
        NodeKind::Camera(_) => None,
    }
}

/// Serialize a regular scene node with the serializer for `generator`.
///
/// Server objects go through `ServerObjectResolver` instead.
pub fn node_to_record(generator: Generator, node: &SceneNode) -> Result<Record, SerializeError> {
    match generator {
        Generator::Scene => SceneSerializer.to_json(node),
        Generator::Group => GroupSerializer.to_json(node),
        Generator::Mesh => MeshSerializer.to_json(node),
        Generator::Sprite => SpriteSerializer.to_json(node),
        Generator::AmbientLight => AmbientLightSerializer.to_json(node),
        Generator::DirectionalLight => DirectionalLightSerializer.to_json(node),
        Generator::HemisphereLight => HemisphereLightSerializer.to_json(node),
        Generator::PointLight => PointLightSerializer.to_json(node),
        Generator::SpotLight => SpotLightSerializer.to_json(node),
        Generator::RectAreaLight => RectAreaLightSerializer.to_json(node),
        Generator::Options
        | Generator::PerspectiveCamera
        | Generator::OrthographicCamera
        | Generator::WebGLRenderer
        | Generator::Script
        | Generator::ServerObject => Err(mismatch(generator, node.type_name())),
    }
}

/// Rebuild a regular scene node from its record.
pub fn node_from_record(generator: Generator, record: &Record) -> Result<SceneNode, SerializeError> {
    match generator {
        Generator::Scene => SceneSerializer.from_json(record),
        Generator::Group => GroupSerializer.from_json(record),
        Generator::Mesh => MeshSerializer.from_json(record),
        Generator::Sprite => SpriteSerializer.from_json(record),
        Generator::AmbientLight => AmbientLightSerializer.from_json(record),
        Generator::DirectionalLight => DirectionalLightSerializer.from_json(record),
        Generator::HemisphereLight => HemisphereLightSerializer.from_json(record),
        Generator::PointLight => PointLightSerializer.from_json(record),
        Generator::SpotLight => SpotLightSerializer.from_json(record),
        Generator::RectAreaLight => RectAreaLightSerializer.from_json(record),
        Generator::Options
        | Generator::PerspectiveCamera
        | Generator::OrthographicCamera
        | Generator::WebGLRenderer
        | Generator::Script
        | Generator::ServerObject => Err(mismatch(generator, &record.metadata.type_name)),
    }
}

pub fn camera_to_record(camera: &Camera) -> Result<Record, SerializeError> {
    match camera.projection {
        Projection::Perspective { .. } => PerspectiveCameraSerializer.to_json(camera),
        Projection::Orthographic { .. } => OrthographicCameraSerializer.to_json(camera),
    }
}

pub fn camera_from_record(generator: Generator, record: &Record) -> Result<Camera, SerializeError> {
    match generator {
        Generator::PerspectiveCamera => PerspectiveCameraSerializer.from_json(record),
        Generator::OrthographicCamera => OrthographicCameraSerializer.from_json(record),
        other => Err(mismatch(other, &record.metadata.type_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_scene::{
        AmbientLight, CameraProps, Color, DirectionalLight, Geometry, Material, PointLight,
        RectAreaLight, SpotLight,
    };

    fn sample_nodes() -> Vec<SceneNode> {
        vec![
            SceneNode::scene("Scene"),
            SceneNode::group("Group"),
            SceneNode::mesh("Ball", Geometry::sphere(0.5), Material::default()),
            SceneNode::sprite("Sprite", Material::default()),
            SceneNode::new("Point", NodeKind::PointLight(PointLight::default())),
            SceneNode::new("Spot", NodeKind::SpotLight(SpotLight::default())),
            SceneNode::new(
                "Fill",
                NodeKind::AmbientLight(AmbientLight {
                    color: Color::from_hex(0x202040),
                    intensity: 0.3,
                }),
            ),
            SceneNode::new(
                "Sun",
                NodeKind::DirectionalLight(DirectionalLight {
                    color: Color::from_hex(0xfff4e0),
                    intensity: 2.5,
                }),
            )
            .with_position([5.0, 10.0, 7.5]),
            SceneNode::new(
                "Window",
                NodeKind::RectAreaLight(RectAreaLight {
                    color: Color::from_hex(0xaaccff),
                    intensity: 4.0,
                    width: 2.0,
                    height: 0.5,
                }),
            ),
        ]
    }

    #[test]
    fn test_dispatch_round_trip() {
        for node in sample_nodes() {
            let generator = generator_for(&node.kind).unwrap();
            let record = node_to_record(generator, &node).unwrap();
            assert_eq!(record.generator(), Some(generator));
            assert_eq!(record.metadata.type_name, node.type_name());
            assert_eq!(node_from_record(generator, &record).unwrap(), node);
        }
    }

    #[test]
    fn test_light_fields_survive() {
        let window = SceneNode::new(
            "Window",
            NodeKind::RectAreaLight(RectAreaLight {
                color: Color::from_hex(0xaaccff),
                intensity: 4.0,
                width: 2.0,
                height: 0.5,
            }),
        );
        let record = node_to_record(Generator::RectAreaLight, &window).unwrap();
        assert_eq!(record.metadata.generator, "RectAreaLightSerializer");
        assert_eq!(record.fields["width"], serde_json::json!(2.0));
        assert_eq!(record.fields["height"], serde_json::json!(0.5));

        match node_from_record(Generator::RectAreaLight, &record).unwrap().kind {
            NodeKind::RectAreaLight(light) => {
                assert_eq!(light.color, Color::from_hex(0xaaccff));
                assert_eq!(light.intensity, 4.0);
                assert_eq!((light.width, light.height), (2.0, 0.5));
            }
            other => panic!("unexpected kind {:?}", other),
        }

        let sun = SceneNode::new(
            "Sun",
            NodeKind::DirectionalLight(DirectionalLight {
                color: Color::from_hex(0xfff4e0),
                intensity: 2.5,
            }),
        );
        let record = node_to_record(Generator::DirectionalLight, &sun).unwrap();
        assert_eq!(record.fields["intensity"], serde_json::json!(2.5));
        assert!(node_to_record(Generator::AmbientLight, &sun).is_err());
    }

    #[test]
    fn test_camera_node_has_no_serializer() {
        let node = SceneNode::new(
            "Cam",
            NodeKind::Camera(CameraProps {
                projection: Projection::default(),
            }),
        );
        assert_eq!(generator_for(&node.kind), None);
    }

    #[test]
    fn test_camera_dispatch_by_projection() {
        let ortho = Camera::new("Top", Projection::orthographic(5.0, 5.0, 0.1, 50.0));
        let record = camera_to_record(&ortho).unwrap();
        assert_eq!(record.generator(), Some(Generator::OrthographicCamera));
        assert_eq!(camera_from_record(Generator::OrthographicCamera, &record).unwrap(), ortho);
        assert!(camera_from_record(Generator::Script, &record).is_err());
    }
}
