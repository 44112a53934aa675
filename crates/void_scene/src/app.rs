//! Application-level resources persisted alongside the scene: options,
//! renderer configuration and scripts.

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Supersampling anti-aliasing pass settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SsaaSettings {
    pub enabled: bool,
    /// Samples are `2^sample_level`; valid range is 0..=5.
    pub sample_level: u8,
    pub unbiased: bool,
}

impl Default for SsaaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_level: 3,
            unbiased: true,
        }
    }
}

impl SsaaSettings {
    pub const MAX_SAMPLE_LEVEL: u8 = 5;

    pub fn sample_count(&self) -> u32 {
        1 << self.sample_level.min(Self::MAX_SAMPLE_LEVEL)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessing {
    pub ssaa: SsaaSettings,
}

/// Per-project editor options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppOptions {
    pub project_name: String,
    /// Whether the command history is persisted with the scene.
    pub save_history: bool,
    pub enable_physics: bool,
    pub post_processing: PostProcessing,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            project_name: "Untitled".to_string(),
            save_history: true,
            enable_physics: false,
            post_processing: PostProcessing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowMapType {
    Basic,
    #[default]
    Pcf,
    PcfSoft,
    Vsm,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToneMapping {
    #[default]
    None,
    Linear,
    Reinhard,
    Cineon,
    AcesFilmic,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowMapConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: ShadowMapType,
}

impl Default for ShadowMapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: ShadowMapType::Pcf,
        }
    }
}

/// Renderer settings that belong to the document rather than the machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    pub antialias: bool,
    pub shadow_map: ShadowMapConfig,
    pub gamma_factor: f32,
    pub gamma_output: bool,
    pub physically_correct_lights: bool,
    pub tone_mapping: ToneMapping,
    pub tone_mapping_exposure: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            shadow_map: ShadowMapConfig::default(),
            gamma_factor: 2.0,
            gamma_output: false,
            physically_correct_lights: false,
            tone_mapping: ToneMapping::None,
            tone_mapping_exposure: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScriptKind {
    #[default]
    Javascript,
    VertexShader,
    FragmentShader,
    Json,
}

/// A user script attached to the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ScriptKind,
    pub source: String,
}

impl Script {
    pub fn new(name: impl Into<String>, kind: ScriptKind, source: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            source: source.into(),
        }
    }
}
