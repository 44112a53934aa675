//! Scene persistence.
//!
//! - [`Record`]: one flat JSON object per persisted instance
//! - [`TypeSerializer`]: per-variant conversion, dispatched by [`registry`]
//! - [`ServerObjectResolver`]: reference records for server-hosted assets
//! - [`Converter`]: whole documents, tolerant of dangling references

mod app;
mod camera;
mod converter;
mod error;
mod light;
mod object;
mod record;
pub mod registry;
mod renderer;
mod serializer;
mod server_object;

pub use app::{OptionsSerializer, ScriptSerializer, OPTIONS_ID};
pub use camera::{OrthographicCameraSerializer, PerspectiveCameraSerializer};
pub use converter::{BundleRef, Converter, SceneBundle};
pub use error::{ResolveError, SerializeError};
pub use light::{
    AmbientLightSerializer, DirectionalLightSerializer, HemisphereLightSerializer,
    PointLightSerializer, RectAreaLightSerializer, SpotLightSerializer,
};
pub use object::{GroupSerializer, MeshSerializer, SceneSerializer, SpriteSerializer};
pub use record::{ConvertWarning, Converted, Generator, Metadata, Record};
pub use renderer::{WebGLRendererSerializer, RENDERER_ID};
pub use serializer::{ObjectBody, TypeSerializer};
pub use server_object::{LoadOptions, ServerObjectResolver};
