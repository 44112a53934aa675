//! Renderer settings serializer.

use void_scene::{NodeId, RendererConfig};

use super::error::SerializeError;
use super::record::{Generator, Record};
use super::serializer::TypeSerializer;

/// Fixed record id of the renderer section.
pub const RENDERER_ID: &str = "renderer";

pub struct WebGLRendererSerializer;

impl TypeSerializer for WebGLRendererSerializer {
    type Target = RendererConfig;

    fn generator(&self) -> Generator {
        Generator::WebGLRenderer
    }

    fn to_json(&self, renderer: &RendererConfig) -> Result<Record, SerializeError> {
        Record::new(
            NodeId::from_string(RENDERER_ID),
            self.generator(),
            "WebGLRenderer",
            Vec::new(),
            renderer,
        )
    }

    fn from_json(&self, record: &Record) -> Result<RendererConfig, SerializeError> {
        record.body()
    }
}
