//! Parametric geometry descriptions.
//!
//! Only the construction parameters are stored; vertex buffers are the
//! renderer's business and are rebuilt from these on load.

use serde::{Deserialize, Serialize};

fn one() -> u32 {
    1
}

/// Geometry of a mesh, tagged by `type` when persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    #[serde(rename = "BoxGeometry", rename_all = "camelCase")]
    Box {
        width: f32,
        height: f32,
        depth: f32,
        #[serde(default = "one")]
        width_segments: u32,
        #[serde(default = "one")]
        height_segments: u32,
        #[serde(default = "one")]
        depth_segments: u32,
    },
    #[serde(rename = "SphereGeometry", rename_all = "camelCase")]
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    #[serde(rename = "PlaneGeometry", rename_all = "camelCase")]
    Plane {
        width: f32,
        height: f32,
        #[serde(default = "one")]
        width_segments: u32,
        #[serde(default = "one")]
        height_segments: u32,
    },
    #[serde(rename = "CylinderGeometry", rename_all = "camelCase")]
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        #[serde(default)]
        open_ended: bool,
    },
    #[serde(rename = "TorusGeometry", rename_all = "camelCase")]
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    #[serde(rename = "TeapotGeometry", rename_all = "camelCase")]
    Teapot {
        size: f32,
        segments: u32,
        bottom: bool,
        lid: bool,
        body: bool,
        fit_lid: bool,
        blinn: bool,
    },
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Box {
            width,
            height,
            depth,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Geometry::Plane {
            width,
            height,
            width_segments: 1,
            height_segments: 1,
        }
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        Geometry::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments: 32,
            open_ended: false,
        }
    }

    pub fn torus(radius: f32, tube: f32) -> Self {
        Geometry::Torus {
            radius,
            tube,
            radial_segments: 16,
            tubular_segments: 48,
        }
    }

    /// The teapot with the property panel's default parameters.
    pub fn teapot() -> Self {
        Geometry::Teapot {
            size: 3.0,
            segments: 10,
            bottom: true,
            lid: true,
            body: true,
            fit_lid: true,
            blinn: true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Box { .. } => "BoxGeometry",
            Geometry::Sphere { .. } => "SphereGeometry",
            Geometry::Plane { .. } => "PlaneGeometry",
            Geometry::Cylinder { .. } => "CylinderGeometry",
            Geometry::Torus { .. } => "TorusGeometry",
            Geometry::Teapot { .. } => "TeapotGeometry",
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::cuboid(1.0, 1.0, 1.0)
    }
}
