//! # void_scene - Scene Graph Data Model
//!
//! Plain data types for the editor's scene: nodes and their variants,
//! parametric geometry, materials, lights, cameras and the document-level
//! resources (options, renderer settings, scripts) that are persisted with
//! a scene.
//!
//! The tree itself lives in [`SceneGraph`], an arena keyed by [`NodeId`].
//! Nothing in this crate knows about persistence formats or undo; those
//! belong to `void_editor`.

pub mod app;
pub mod camera;
pub mod color;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod light;
pub mod material;
pub mod node;
pub mod transform;

pub use app::{
    AppOptions, PostProcessing, RendererConfig, Script, ScriptKind, ShadowMapConfig,
    ShadowMapType, SsaaSettings, ToneMapping,
};
pub use camera::{Camera, Projection};
pub use color::Color;
pub use error::{Result, SceneError};
pub use geometry::Geometry;
pub use graph::{PreorderIter, SceneGraph, Subtree};
pub use id::NodeId;
pub use light::{
    AmbientLight, DirectionalLight, HemisphereLight, PointLight, RectAreaLight, SpotLight,
};
pub use material::{Material, MaterialKind};
pub use node::{
    CameraProps, Fog, MeshProps, NodeKind, SceneNode, SceneProps, ServerAssetKind,
    ServerAssetRef, ServerObject, ServerPayload, SpriteProps, SERVER_KEY,
};
pub use transform::Transform;
