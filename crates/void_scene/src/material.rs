//! Surface materials for meshes and sprites.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Shading model of a material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    #[default]
    MeshStandardMaterial,
    MeshBasicMaterial,
    MeshPhongMaterial,
    MeshLambertMaterial,
    SpriteMaterial,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Material {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub color: Color,
    pub emissive: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub roughness: f32,
    pub metalness: f32,
    /// Texture reference (asset url or id), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::MeshStandardMaterial,
            color: Color::WHITE,
            emissive: Color::BLACK,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
        }
    }
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn basic(color: Color) -> Self {
        Self {
            kind: MaterialKind::MeshBasicMaterial,
            color,
            ..Default::default()
        }
    }

    pub fn sprite(color: Color) -> Self {
        Self {
            kind: MaterialKind::SpriteMaterial,
            color,
            ..Default::default()
        }
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.map = Some(map.into());
        self
    }
}
