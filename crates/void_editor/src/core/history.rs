//! Undo/Redo history with command merging and transaction support.
//!
//! History is a single list of executed commands plus a cursor: entries
//! before the cursor are applied (undoable), entries from the cursor on
//! have been undone (redoable). Executing a new command discards the redo
//! branch.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::config::HistoryConfig;
use super::EditorState;
use crate::commands::{command_from_record, Command, CommandError, CommandRecord, CommandResult, MultiCommand};

/// Which updatable commands may coalesce into the previous entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Same command kind editing the same object and attribute.
    #[default]
    SameTarget,
    /// Same command kind, whatever it edits.
    SameType,
}

/// Persisted form of a history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Applied commands, oldest first.
    #[serde(default)]
    pub undos: Vec<CommandRecord>,
    /// Undone commands, next redo first.
    #[serde(default)]
    pub redos: Vec<CommandRecord>,
}

/// A group of commands executed as a single undoable unit.
pub struct Transaction {
    pub name: String,
    pub commands: Vec<Box<dyn Command>>,
}

impl Transaction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, cmd: Box<dyn Command>) {
        self.commands.push(cmd);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

struct Entry {
    id: u64,
    command: Box<dyn Command>,
}

pub struct History {
    entries: Vec<Entry>,
    cursor: usize,
    next_id: u64,
    max_size: usize,
    merge_policy: MergePolicy,
    merge_window: Option<Duration>,
    /// Time of the last execute; cleared by undo, redo and loads so that
    /// nothing merges across them.
    last_execute: Option<Instant>,
    current_transaction: Option<Transaction>,
    dirty: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Default maximum history size.
    pub const DEFAULT_MAX_SIZE: usize = 100;
    pub const DEFAULT_MERGE_WINDOW: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            next_id: 1,
            max_size: max_size.max(1),
            merge_policy: MergePolicy::SameTarget,
            merge_window: Some(Self::DEFAULT_MERGE_WINDOW),
            last_execute: None,
            current_transaction: None,
            dirty: false,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        let mut history = Self::with_capacity(config.max_size);
        history.merge_policy = config.merge_policy;
        history.merge_window = config.merge_window();
        history
    }

    pub fn set_merge_policy(&mut self, policy: MergePolicy) {
        self.merge_policy = policy;
    }

    /// `None` lets commands merge regardless of the time between them.
    pub fn set_merge_window(&mut self, window: Option<Duration>) {
        self.merge_window = window;
    }

    /// Execute a command and record it.
    ///
    /// On failure the command is dropped and history is left unchanged.
    /// Inside a transaction the command is applied and held until commit.
    pub fn execute(&mut self, mut cmd: Box<dyn Command>, state: &mut EditorState) -> CommandResult {
        cmd.execute(state)?;

        if let Some(ref mut transaction) = self.current_transaction {
            transaction.push(cmd);
            return Ok(());
        }
        self.push_executed(cmd);
        Ok(())
    }

    fn push_executed(&mut self, cmd: Box<dyn Command>) {
        // Clear redo on new action
        self.entries.truncate(self.cursor);

        let merged = if self.can_merge(cmd.as_ref()) {
            match self.entries.last_mut() {
                Some(last) => last.command.update(cmd.as_ref()),
                None => false,
            }
        } else {
            false
        };

        if merged {
            log::debug!("History: merged '{}' into previous entry", cmd.description());
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.entries.push(Entry { id, command: cmd });
        }

        // Trim if over limit
        while self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
        self.last_execute = Some(Instant::now());
        self.dirty = true;
    }

    fn can_merge(&self, cmd: &dyn Command) -> bool {
        let (Some(last), Some(at)) = (self.entries.last(), self.last_execute) else {
            return false;
        };
        if let Some(window) = self.merge_window {
            if at.elapsed() > window {
                return false;
            }
        }
        let last = last.command.as_ref();
        if !(last.updatable() && cmd.updatable() && last.kind() == cmd.kind()) {
            return false;
        }
        match self.merge_policy {
            MergePolicy::SameType => true,
            MergePolicy::SameTarget => {
                let key = last.merge_key();
                key.is_some() && key == cmd.merge_key()
            }
        }
    }

    /// Undo the command behind the cursor. Returns `Ok(false)` when there is
    /// nothing to undo.
    pub fn undo(&mut self, state: &mut EditorState) -> Result<bool, CommandError> {
        if self.current_transaction.is_some() {
            log::warn!("Undo ignored while a transaction is open");
            return Ok(false);
        }
        if self.cursor == 0 {
            return Ok(false);
        }
        let entry = &mut self.entries[self.cursor - 1];
        entry.command.undo(state)?;
        log::debug!("Undo: {}", entry.command.description());

        self.cursor -= 1;
        self.last_execute = None;
        self.dirty = true;
        Ok(true)
    }

    /// Re-execute the command at the cursor. Returns `Ok(false)` when there
    /// is nothing to redo.
    pub fn redo(&mut self, state: &mut EditorState) -> Result<bool, CommandError> {
        if self.current_transaction.is_some() {
            log::warn!("Redo ignored while a transaction is open");
            return Ok(false);
        }
        let Some(entry) = self.entries.get_mut(self.cursor) else {
            return Ok(false);
        };
        entry.command.execute(state)?;
        log::debug!("Redo: {}", entry.command.description());

        self.cursor += 1;
        self.last_execute = None;
        self.dirty = true;
        Ok(true)
    }

    /// Undo or redo until the command with `id` is the last applied one.
    /// Returns `Ok(false)` if no entry has that id.
    pub fn go_to_state(&mut self, id: u64, state: &mut EditorState) -> Result<bool, CommandError> {
        let Some(position) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let target = position + 1;
        while self.cursor > target {
            if !self.undo(state)? {
                break;
            }
        }
        while self.cursor < target {
            if !self.redo(state)? {
                break;
            }
        }
        Ok(true)
    }

    /// Check if there are commands to undo.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if there are commands to redo.
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Get the description of the next undo command.
    pub fn undo_description(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.command.description())
    }

    /// Get the description of the next redo command.
    pub fn redo_description(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|e| e.command.description())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Ids of all entries, oldest first.
    pub fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark as saved (clears dirty flag).
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Begin a new transaction.
    /// Commands executed during a transaction are grouped as one undo unit.
    pub fn begin_transaction(&mut self, name: impl Into<String>) {
        if self.current_transaction.is_some() {
            log::warn!("Beginning transaction while one is already open");
        }
        self.current_transaction = Some(Transaction::new(name));
    }

    /// Commit the current transaction as a single [`MultiCommand`] entry.
    pub fn commit_transaction(&mut self) {
        if let Some(transaction) = self.current_transaction.take() {
            if !transaction.is_empty() {
                self.push_executed(Box::new(MultiCommand::new(transaction.name, transaction.commands)));
            }
        }
    }

    /// Undo everything executed since the transaction began and discard it.
    pub fn rollback_transaction(&mut self, state: &mut EditorState) -> CommandResult {
        if let Some(transaction) = self.current_transaction.take() {
            for mut cmd in transaction.commands.into_iter().rev() {
                cmd.undo(state)?;
            }
        }
        Ok(())
    }

    /// Check if a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.current_transaction.is_some()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.last_execute = None;
        self.current_transaction = None;
        self.dirty = false;
    }

    pub fn to_json(&self) -> Result<HistoryRecord, CommandError> {
        let mut record = HistoryRecord::default();
        for (i, entry) in self.entries.iter().enumerate() {
            let mut command = entry.command.to_record()?;
            command.id = entry.id;
            if i < self.cursor {
                record.undos.push(command);
            } else {
                record.redos.push(command);
            }
        }
        Ok(record)
    }

    /// Replace the history with persisted commands. Nothing is replayed: the
    /// scene is expected to already reflect the undo list.
    pub fn from_json(&mut self, record: &HistoryRecord) -> Result<(), CommandError> {
        let mut entries = Vec::with_capacity(record.undos.len() + record.redos.len());
        for command in record.undos.iter().chain(&record.redos) {
            entries.push(Entry {
                id: command.id,
                command: command_from_record(command)?,
            });
        }

        self.next_id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.cursor = record.undos.len();
        self.entries = entries;
        self.last_execute = None;
        self.current_transaction = None;
        self.dirty = false;
        Ok(())
    }
}
