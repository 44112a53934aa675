//! Editor camera serializers, one per projection.

use serde::{Deserialize, Serialize};
use void_scene::{Camera, Projection, Transform};

use super::error::SerializeError;
use super::record::{Generator, Record};
use super::serializer::{mismatch, TypeSerializer};

#[derive(Serialize, Deserialize)]
struct CameraBody {
    name: String,
    #[serde(flatten)]
    transform: Transform,
    projection: Projection,
}

fn camera_to_json(generator: Generator, camera: &Camera) -> Result<Record, SerializeError> {
    let body = CameraBody {
        name: camera.name.clone(),
        transform: camera.transform,
        projection: camera.projection.clone(),
    };
    Record::new(
        camera.id.clone(),
        generator,
        camera.projection.type_name(),
        Vec::new(),
        &body,
    )
}

fn camera_from_json(record: &Record) -> Result<Camera, SerializeError> {
    let body: CameraBody = record.body()?;
    Ok(Camera {
        id: record.id.clone(),
        name: body.name,
        transform: body.transform,
        projection: body.projection,
    })
}

pub struct PerspectiveCameraSerializer;

impl TypeSerializer for PerspectiveCameraSerializer {
    type Target = Camera;

    fn generator(&self) -> Generator {
        Generator::PerspectiveCamera
    }

    fn to_json(&self, camera: &Camera) -> Result<Record, SerializeError> {
        match camera.projection {
            Projection::Perspective { .. } => camera_to_json(self.generator(), camera),
            _ => Err(mismatch(self.generator(), camera.projection.type_name())),
        }
    }

    fn from_json(&self, record: &Record) -> Result<Camera, SerializeError> {
        let camera = camera_from_json(record)?;
        match camera.projection {
            Projection::Perspective { .. } => Ok(camera),
            _ => Err(mismatch(self.generator(), camera.projection.type_name())),
        }
    }
}

pub struct OrthographicCameraSerializer;

impl TypeSerializer for OrthographicCameraSerializer {
    type Target = Camera;

    fn generator(&self) -> Generator {
        Generator::OrthographicCamera
    }

    fn to_json(&self, camera: &Camera) -> Result<Record, SerializeError> {
        match camera.projection {
            Projection::Orthographic { .. } => camera_to_json(self.generator(), camera),
            _ => Err(mismatch(self.generator(), camera.projection.type_name())),
        }
    }

    fn from_json(&self, record: &Record) -> Result<Camera, SerializeError> {
        let camera = camera_from_json(record)?;
        match camera.projection {
            Projection::Orthographic { .. } => Ok(camera),
            _ => Err(mismatch(self.generator(), camera.projection.type_name())),
        }
    }
}
