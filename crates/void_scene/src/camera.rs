//! Cameras.

use serde::{Deserialize, Serialize};

use crate::{NodeId, Transform};

/// Camera projection, tagged by `type` when persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Projection {
    #[serde(rename = "PerspectiveCamera")]
    Perspective {
        /// Vertical field of view in degrees.
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
        zoom: f32,
    },
    #[serde(rename = "OrthographicCamera")]
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
        zoom: f32,
    },
}

impl Projection {
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Projection::Perspective {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
        }
    }

    pub fn orthographic(half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        Projection::Orthographic {
            left: -half_width,
            right: half_width,
            top: half_height,
            bottom: -half_height,
            near,
            far,
            zoom: 1.0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Projection::Perspective { .. } => "PerspectiveCamera",
            Projection::Orthographic { .. } => "OrthographicCamera",
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(50.0, 1.0, 0.1, 1000.0)
    }
}

/// The editor's viewing camera, persisted as its own top-level record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: NodeId,
    pub name: String,
    pub transform: Transform,
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            id: NodeId::new(),
            name: "DefaultCamera".to_string(),
            transform: Transform::new().with_position([0.0, 5.0, 10.0]),
            projection: Projection::default(),
        }
    }
}

impl Camera {
    pub fn new(name: impl Into<String>, projection: Projection) -> Self {
        Self {
            name: name.into(),
            projection,
            ..Default::default()
        }
    }
}
