//! Serialization error types.

use thiserror::Error;
use void_asset_server::{FetchError, LoaderError};
use void_scene::{NodeId, SceneError};

/// Failure to build a record from an instance or an instance from a record.
///
/// These are construction errors: they abort the whole conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializeError {
    #[error("{serializer} cannot handle a {found}")]
    VariantMismatch {
        serializer: &'static str,
        found: String,
    },

    #[error("Malformed record {id} ({generator}): {message}")]
    Malformed {
        generator: String,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Failure to materialize a server-owned node.
///
/// Everything except [`ResolveError::Record`] is recoverable: the converter
/// logs it and skips the node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Server object {id} has no usable asset reference: {message}")]
    MissingAsset { id: NodeId, message: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] LoaderError),

    #[error(transparent)]
    Record(#[from] SerializeError),
}

impl ResolveError {
    /// Whether the converter may skip the node and carry on.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ResolveError::Record(_))
    }
}
