//! Whole-document conversion between live state and a flat record list.
//!
//! Writing emits options, camera, renderer, scripts and then the scene tree
//! in pre-order. Reading locates the document sections by generator and
//! rebuilds the tree breadth-first from the scene record, awaiting each
//! server object before its children are queued.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use void_asset_server::AssetFetcher;
use void_scene::{AppOptions, Camera, NodeId, NodeKind, RendererConfig, SceneGraph, Script};

use super::app::{OptionsSerializer, ScriptSerializer};
use super::error::{ResolveError, SerializeError};
use super::object::SceneSerializer;
use super::record::{ConvertWarning, Converted, Generator, Record};
use super::registry::{
    camera_from_record, camera_to_record, generator_for, node_from_record, node_to_record,
};
use super::renderer::WebGLRendererSerializer;
use super::serializer::TypeSerializer;
use super::server_object::{LoadOptions, ServerObjectResolver};
use crate::core::EditorState;

/// Everything a document persists.
#[derive(Debug, Clone, Default)]
pub struct SceneBundle {
    pub options: Option<AppOptions>,
    pub camera: Option<Camera>,
    pub renderer: Option<RendererConfig>,
    pub scripts: Vec<Script>,
    pub scene: SceneGraph,
}

/// Borrowed view of a document for writing.
#[derive(Clone, Copy)]
pub struct BundleRef<'a> {
    pub options: Option<&'a AppOptions>,
    pub camera: Option<&'a Camera>,
    pub renderer: Option<&'a RendererConfig>,
    pub scripts: &'a [Script],
    pub scene: &'a SceneGraph,
}

impl<'a> From<&'a SceneBundle> for BundleRef<'a> {
    fn from(bundle: &'a SceneBundle) -> Self {
        Self {
            options: bundle.options.as_ref(),
            camera: bundle.camera.as_ref(),
            renderer: bundle.renderer.as_ref(),
            scripts: &bundle.scripts,
            scene: &bundle.scene,
        }
    }
}

impl<'a> From<&'a EditorState> for BundleRef<'a> {
    fn from(state: &'a EditorState) -> Self {
        Self {
            options: Some(&state.options),
            camera: Some(&state.camera),
            renderer: Some(&state.renderer),
            scripts: &state.scripts,
            scene: &state.scene,
        }
    }
}

#[derive(Debug)]
pub struct Converter {
    resolver: ServerObjectResolver,
}

impl Converter {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            resolver: ServerObjectResolver::new(fetcher),
        }
    }

    pub fn resolver(&self) -> &ServerObjectResolver {
        &self.resolver
    }

    pub fn to_json<'a>(
        &self,
        bundle: impl Into<BundleRef<'a>>,
    ) -> Result<Converted<Vec<Record>>, SerializeError> {
        let bundle = bundle.into();
        let mut out = Converted::new(Vec::new());

        match bundle.options {
            Some(options) => out.value.push(OptionsSerializer.to_json(options)?),
            None => out.warn(ConvertWarning::MissingSection("options")),
        }
        match bundle.camera {
            Some(camera) => out.value.push(camera_to_record(camera)?),
            None => out.warn(ConvertWarning::MissingSection("camera")),
        }
        match bundle.renderer {
            Some(renderer) => out.value.push(WebGLRendererSerializer.to_json(renderer)?),
            None => out.warn(ConvertWarning::MissingSection("renderer")),
        }
        for script in bundle.scripts {
            out.value.push(ScriptSerializer.to_json(script)?);
        }

        for node in bundle.scene.iter_preorder() {
            if node.is_server_owned() {
                out.value.push(self.resolver.to_json(node)?);
                continue;
            }
            if let NodeKind::ServerObject(_) = node.kind {
                // Unflagged server objects are written when they still carry
                // a reference, and skipped otherwise.
                match self.resolver.to_json(node) {
                    Ok(record) => out.value.push(record),
                    Err(SerializeError::Malformed { message, .. }) => {
                        out.warn(ConvertWarning::ServerObjectFailed {
                            id: node.id.clone(),
                            message,
                        })
                    }
                    Err(e) => return Err(e),
                }
                continue;
            }
            match generator_for(&node.kind) {
                Some(generator) => out.value.push(node_to_record(generator, node)?),
                None => out.warn(ConvertWarning::NoSerializer {
                    id: node.id.clone(),
                    type_name: node.type_name().to_string(),
                }),
            }
        }

        log::debug!("Converter: wrote {} records", out.value.len());
        Ok(out)
    }

    pub async fn from_json(
        &self,
        records: &[Record],
        options: &LoadOptions,
    ) -> Result<Converted<SceneBundle>, SerializeError> {
        let mut out = Converted::new(SceneBundle::default());

        match find(records, &[Generator::Options]) {
            Some((_, record)) => out.value.options = Some(OptionsSerializer.from_json(record)?),
            None => out.warn(ConvertWarning::MissingSection("options")),
        }
        match find(records, &[Generator::PerspectiveCamera, Generator::OrthographicCamera]) {
            Some((generator, record)) => {
                out.value.camera = Some(camera_from_record(generator, record)?)
            }
            None => out.warn(ConvertWarning::MissingSection("camera")),
        }
        match find(records, &[Generator::WebGLRenderer]) {
            Some((_, record)) => {
                out.value.renderer = Some(WebGLRendererSerializer.from_json(record)?)
            }
            None => out.warn(ConvertWarning::MissingSection("renderer")),
        }
        for record in records.iter().filter(|r| r.generator() == Some(Generator::Script)) {
            out.value.scripts.push(ScriptSerializer.from_json(record)?);
        }

        let scene = self.scene_from_json(records, options, &mut out).await?;
        out.value.scene = scene;
        log::info!(
            "Converter: loaded {} nodes, {} scripts, {} warnings",
            out.value.scene.len(),
            out.value.scripts.len(),
            out.warnings.len()
        );
        Ok(out)
    }

    async fn scene_from_json<T>(
        &self,
        records: &[Record],
        options: &LoadOptions,
        out: &mut Converted<T>,
    ) -> Result<SceneGraph, SerializeError> {
        let Some((_, scene_record)) = find(records, &[Generator::Scene]) else {
            out.warn(ConvertWarning::MissingSection("scene"));
            return Ok(SceneGraph::default());
        };

        // First record wins when ids collide.
        let mut by_id: HashMap<&NodeId, &Record> = HashMap::with_capacity(records.len());
        for record in records {
            by_id.entry(&record.id).or_insert(record);
        }

        let mut graph = SceneGraph::new(SceneSerializer.from_json(scene_record)?);
        let mut visited: HashSet<&NodeId> = HashSet::new();
        visited.insert(&scene_record.id);
        let mut parents: HashMap<&NodeId, NodeId> = HashMap::new();
        let mut queue: VecDeque<&Record> = VecDeque::new();
        enqueue_children(scene_record, &by_id, &mut visited, &mut parents, &mut queue, out);

        while let Some(record) = queue.pop_front() {
            let Some(parent) = parents.remove(&record.id) else {
                continue;
            };

            let node = if record.is_server_object() {
                match self.resolver.from_json(record, options).await {
                    Ok(node) => node,
                    Err(ResolveError::Record(e)) => return Err(e),
                    Err(e) => {
                        out.warn(ConvertWarning::ServerObjectFailed {
                            id: record.id.clone(),
                            message: e.to_string(),
                        });
                        continue;
                    }
                }
            } else {
                match record.generator() {
                    Some(generator) if generator.is_scene_node() => {
                        node_from_record(generator, record)?
                    }
                    Some(generator) => {
                        out.warn(ConvertWarning::NotASceneNode {
                            id: record.id.clone(),
                            generator,
                        });
                        continue;
                    }
                    None => {
                        out.warn(ConvertWarning::UnknownGenerator {
                            id: record.id.clone(),
                            generator: record.metadata.generator.clone(),
                        });
                        continue;
                    }
                }
            };

            graph.insert(&parent, node, None)?;
            enqueue_children(record, &by_id, &mut visited, &mut parents, &mut queue, out);
        }

        Ok(graph)
    }
}

/// First record produced by any of `generators`.
fn find<'r>(records: &'r [Record], generators: &[Generator]) -> Option<(Generator, &'r Record)> {
    records.iter().find_map(|record| {
        record
            .generator()
            .filter(|g| generators.contains(g))
            .map(|g| (g, record))
    })
}

fn enqueue_children<'r, T>(
    record: &'r Record,
    by_id: &HashMap<&'r NodeId, &'r Record>,
    visited: &mut HashSet<&'r NodeId>,
    parents: &mut HashMap<&'r NodeId, NodeId>,
    queue: &mut VecDeque<&'r Record>,
    out: &mut Converted<T>,
) {
    for child in &record.children {
        let Some(&child_record) = by_id.get(child) else {
            out.warn(ConvertWarning::MissingChild {
                parent: record.id.clone(),
                child: child.clone(),
            });
            continue;
        };
        if !visited.insert(&child_record.id) {
            out.warn(ConvertWarning::DuplicateVisit { id: child.clone() });
            continue;
        }
        parents.insert(&child_record.id, record.id.clone());
        queue.push_back(child_record);
    }
}
