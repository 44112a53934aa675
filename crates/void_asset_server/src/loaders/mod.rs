//! Payload loaders for server-hosted assets

mod model;
mod texture;

use std::sync::Arc;

use thiserror::Error;
use void_scene::{ServerAssetKind, ServerPayload};

pub use model::{ModelAsset, ModelLoader};
pub use texture::{TextureAsset, TextureLoader};

/// Errors raised while decoding a fetched asset body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoaderError {
    #[error("Failed to parse model {path}: {message}")]
    Json { path: String, message: String },

    #[error("Failed to decode image {path}: {message}")]
    Image { path: String, message: String },
}

/// Decode a fetched asset body into the payload stored on a server node.
pub fn decode_payload(
    kind: ServerAssetKind,
    data: &[u8],
    path: &str,
) -> Result<ServerPayload, LoaderError> {
    match kind {
        ServerAssetKind::Model => {
            let model = ModelLoader::new().load(data, path)?;
            Ok(ServerPayload::Model {
                geometry: model.geometry,
                material: model.material,
            })
        }
        ServerAssetKind::Texture => {
            let texture = TextureLoader::new().load(data, path)?;
            Ok(ServerPayload::Texture {
                width: texture.width,
                height: texture.height,
                pixels: Arc::new(texture.data),
            })
        }
    }
}
