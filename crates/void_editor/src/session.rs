//! Editor session: state, history and persistence behind one owner.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use void_asset_server::{AssetFetcher, RemoteAssetSource, RemoteConfig};
use void_scene::{NodeId, SceneNode};

use crate::commands::{Command, CommandError, CommandResult};
use crate::core::{ConfigError, EditorConfig, EditorState, History, HistoryRecord};
use crate::serialization::{ConvertWarning, Converter, LoadOptions, Record, SerializeError};

/// Session-level errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Command failed: {0}")]
    Command(#[from] CommandError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// On-disk form of a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryRecord>,
}

pub struct Editor {
    pub state: EditorState,
    pub history: History,
    config: EditorConfig,
    converter: Converter,
}

impl Editor {
    /// Editor fetching server objects over HTTP from `config.server`.
    pub fn new(config: EditorConfig) -> Self {
        let remote = RemoteAssetSource::new(RemoteConfig {
            base_url: config.server.base_url.clone(),
            timeout_ms: config.server.timeout_ms,
        });
        Self::with_fetcher(config, Arc::new(remote))
    }

    pub fn with_fetcher(config: EditorConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            state: EditorState::new(),
            history: History::from_config(&config.history),
            config,
            converter: Converter::new(fetcher),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn execute(&mut self, cmd: Box<dyn Command>) -> CommandResult {
        self.history.execute(cmd, &mut self.state)
    }

    pub fn undo(&mut self) -> Result<bool, CommandError> {
        self.history.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> Result<bool, CommandError> {
        self.history.redo(&mut self.state)
    }

    pub fn object_by_id(&self, id: &NodeId) -> Option<&SceneNode> {
        self.state.object_by_id(id)
    }

    /// Snapshot the document, plus the history when the project keeps it.
    pub fn save(&mut self) -> Result<SessionFile, EditorError> {
        let records = self.converter.to_json(&self.state)?.value;
        let history = if self.state.options.save_history {
            Some(self.history.to_json()?)
        } else {
            None
        };
        self.history.mark_saved();
        log::info!("Saved session: {} records", records.len());
        Ok(SessionFile { records, history })
    }

    /// Replace the document with `file`.
    ///
    /// The new scene and history are built off to the side; on error the
    /// current session is left as it was.
    pub async fn load(&mut self, file: &SessionFile) -> Result<Vec<ConvertWarning>, EditorError> {
        let options = LoadOptions {
            server: self.config.server.base_url.clone(),
        };
        let converted = self.converter.from_json(&file.records, &options).await?;

        let mut history = History::from_config(&self.config.history);
        if let Some(record) = &file.history {
            history.from_json(record)?;
        }

        let bundle = converted.value;
        self.state.scene = bundle.scene;
        self.state.camera = bundle.camera.unwrap_or_default();
        self.state.options = bundle.options.unwrap_or_default();
        self.state.renderer = bundle.renderer.unwrap_or_default();
        self.state.scripts = bundle.scripts;
        self.history = history;
        self.state.observers.notify_scene_graph_changed();

        log::info!(
            "Loaded session: {} nodes, {} history entries",
            self.state.scene.len(),
            self.history.len()
        );
        Ok(converted.warnings)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), EditorError> {
        let file = self.save()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub async fn load_from_path(&mut self, path: &Path) -> Result<Vec<ConvertWarning>, EditorError> {
        let content = fs::read_to_string(path)?;
        let file: SessionFile = serde_json::from_str(&content)?;
        self.load(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SetPositionCommand;
    use void_asset_server::MemoryAssetSource;

    fn editor() -> Editor {
        Editor::with_fetcher(EditorConfig::default(), Arc::new(MemoryAssetSource::new()))
    }

    #[test]
    fn test_history_saved_only_when_enabled() {
        let mut editor = editor();
        let root = editor.state.scene.root_id().clone();
        let id = editor.state.scene.insert(&root, SceneNode::group("G"), None).unwrap();
        let cmd = SetPositionCommand::new(&editor.state, id, [1.0, 0.0, 0.0]).unwrap();
        editor.execute(Box::new(cmd)).unwrap();
        assert!(editor.history.is_dirty());

        let file = editor.save().unwrap();
        assert_eq!(file.history.as_ref().map(|h| h.undos.len()), Some(1));
        assert!(!editor.history.is_dirty());

        editor.state.options.save_history = false;
        assert!(editor.save().unwrap().history.is_none());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_scene() {
        let mut editor = editor();
        let root = editor.state.scene.root_id().clone();
        let id = editor.state.scene.insert(&root, SceneNode::group("Keep"), None).unwrap();

        let mut file = editor.save().unwrap();
        let scene = file
            .records
            .iter_mut()
            .find(|r| r.metadata.generator == "SceneSerializer")
            .unwrap();
        scene.fields.insert("name".to_string(), serde_json::json!(42));

        assert!(matches!(
            editor.load(&file).await,
            Err(EditorError::Serialize(SerializeError::Malformed { .. }))
        ));
        assert!(editor.object_by_id(&id).is_some());
    }
}
