//! Model loader for server-hosted JSON model descriptions

use serde::{Deserialize, Serialize};
use void_scene::{Geometry, Material};

use super::LoaderError;

/// A model as served by the asset server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    #[serde(default)]
    pub name: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub material: Material,
}

#[derive(Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, data: &[u8], path: &str) -> Result<ModelAsset, LoaderError> {
        let model: ModelAsset = serde_json::from_slice(data).map_err(|e| LoaderError::Json {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        log::debug!(
            "ModelLoader: {} -> {} geometry",
            path,
            model.geometry.type_name()
        );
        Ok(model)
    }
}
