//! A group of commands applied as a single undo step.

use std::any::Any;

use serde_json::{Map, Value};

use super::command::decode;
use super::{command_from_record, Command, CommandError, CommandKind, CommandRecord, CommandResult};
use crate::core::EditorState;

pub struct MultiCommand {
    name: String,
    commands: Vec<Box<dyn Command>>,
}

impl MultiCommand {
    pub fn new(name: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            name: name.into(),
            commands,
        }
    }

    pub fn push(&mut self, cmd: Box<dyn Command>) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn from_record(record: &CommandRecord) -> Result<Self, CommandError> {
        let commands = decode::<MultiFields>(record)?
            .commands
            .iter()
            .map(command_from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(record.name.clone(), commands))
    }
}

#[derive(serde::Deserialize)]
struct MultiFields {
    #[serde(default)]
    commands: Vec<CommandRecord>,
}

impl Command for MultiCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::Multi
    }

    fn description(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        for i in 0..self.commands.len() {
            if let Err(e) = self.commands[i].execute(state) {
                // Leave the state as it was before the group started.
                for done in self.commands[..i].iter_mut().rev() {
                    if let Err(undo_err) = done.undo(state) {
                        log::error!("MultiCommand: rollback of '{}' failed: {}", done.description(), undo_err);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        // Undo in reverse order
        for cmd in self.commands.iter_mut().rev() {
            cmd.undo(state)?;
        }
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        let mut children = Vec::with_capacity(self.commands.len());
        for (i, cmd) in self.commands.iter().enumerate() {
            let mut record = cmd.to_record()?;
            record.id = i as u64;
            let value = serde_json::to_value(record).map_err(|e| CommandError::Record(e.to_string()))?;
            children.push(value);
        }
        let mut fields = Map::new();
        fields.insert("commands".to_string(), Value::Array(children));
        Ok(CommandRecord {
            kind: self.kind(),
            id: 0,
            name: self.name.clone(),
            fields,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
