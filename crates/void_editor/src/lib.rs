//! Void Editor Core
//!
//! Document model, undo history and persistence for void scenes.
//!
//! ## Features
//!
//! - **Commands**: every scene edit is an invertible, serializable command
//! - **History**: linear undo/redo with coalescing of rapid edits and transactions
//! - **Serialization**: flat JSON record lists with one serializer per node variant
//! - **Server objects**: nodes whose content is fetched from the asset server on load
//! - **Sessions**: save and restore the document together with its history
//!
//! ## Architecture
//!
//! ```text
//! Caller → Command → History → EditorState → ChangeObservers
//!                                  ↕
//!                 Converter ↔ Vec<Record> ↔ session file
//! ```
//!
//! All modifications go through the command system for undo/redo support.

pub mod commands;
pub mod core;
pub mod serialization;
pub mod session;

pub use core::{
    ChangeObservers, EditorConfig, EditorState, History, HistoryRecord, MergePolicy,
    SubscriberId,
};

pub use commands::{command_from_record, Command, CommandError, CommandKind, CommandRecord, CommandResult};

pub use serialization::{
    ConvertWarning, Converted, Converter, Generator, LoadOptions, Record, SceneBundle,
    SerializeError, TypeSerializer,
};

pub use session::{Editor, EditorError, SessionFile};

/// Editor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Editor name
pub const NAME: &str = "Void Engine Editor";
