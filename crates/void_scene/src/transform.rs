//! Local transforms of scene nodes.

use serde::{Deserialize, Serialize};

/// Position, Euler rotation (radians, XYZ order) and scale of a node
/// relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn with_position(mut self, pos: [f32; 3]) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rot: [f32; 3]) -> Self {
        self.rotation = rot;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = [scale, scale, scale];
        self
    }

    pub fn with_scale_xyz(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }
}
