//! Core editor types and state management.
//!
//! This module contains the central `EditorState` and supporting types
//! that form the foundation of the editor.

mod config;
pub mod editor_state;
mod history;
mod observers;

pub use config::{ConfigError, EditorConfig, HistoryConfig, ServerConfig};
pub use editor_state::EditorState;
pub use history::{History, HistoryRecord, MergePolicy, Transaction};
pub use observers::{ChangeHandler, ChangeObservers, GraphHandler, SubscriberId};
