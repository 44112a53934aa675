//! Document script commands.

use std::any::Any;

use serde::{Deserialize, Serialize};
use void_scene::{NodeId, Script};

use super::command::encode;
use super::{Command, CommandError, CommandKind, CommandRecord, CommandResult, MergeKey};
use crate::core::EditorState;

/// Command to add a script to the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddScriptCommand {
    pub script: Script,
    pub index: Option<usize>,
}

impl AddScriptCommand {
    pub fn new(script: Script) -> Self {
        Self { script, index: None }
    }
}

impl Command for AddScriptCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::AddScript
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        if state.script(&self.script.id).is_some() {
            return Err(CommandError::InvalidOperation(format!(
                "script {} already exists",
                self.script.id
            )));
        }
        let index = state.add_script(self.script.clone(), self.index);
        self.index = Some(index);
        state.observers.notify_script_changed(&self.script.id);
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        let (script, _) = state
            .remove_script(&self.script.id)
            .ok_or_else(|| CommandError::ScriptNotFound(self.script.id.clone()))?;
        self.script = script;
        state.observers.notify_script_changed(&self.script.id);
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to remove a script from the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveScriptCommand {
    pub script: Script,
    pub index: usize,
}

impl RemoveScriptCommand {
    pub fn new(state: &EditorState, script_uuid: &NodeId) -> Result<Self, CommandError> {
        let index = state
            .script_index(script_uuid)
            .ok_or_else(|| CommandError::ScriptNotFound(script_uuid.clone()))?;
        Ok(Self {
            script: state.scripts[index].clone(),
            index,
        })
    }
}

impl Command for RemoveScriptCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::RemoveScript
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        let (script, index) = state
            .remove_script(&self.script.id)
            .ok_or_else(|| CommandError::ScriptNotFound(self.script.id.clone()))?;
        self.script = script;
        self.index = index;
        state.observers.notify_script_changed(&self.script.id);
        Ok(())
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        state.add_script(self.script.clone(), Some(self.index));
        state.observers.notify_script_changed(&self.script.id);
        Ok(())
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Command to replace a script's source text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScriptSourceCommand {
    pub script_uuid: NodeId,
    pub old_source: String,
    pub new_source: String,
}

impl SetScriptSourceCommand {
    pub fn new(state: &EditorState, script_uuid: NodeId, new_source: impl Into<String>) -> Result<Self, CommandError> {
        let old_source = state
            .script(&script_uuid)
            .map(|s| s.source.clone())
            .ok_or_else(|| CommandError::ScriptNotFound(script_uuid.clone()))?;
        Ok(Self {
            script_uuid,
            old_source,
            new_source: new_source.into(),
        })
    }

    fn apply(&self, state: &mut EditorState, source: &str) -> CommandResult {
        let script = state
            .script_mut(&self.script_uuid)
            .ok_or_else(|| CommandError::ScriptNotFound(self.script_uuid.clone()))?;
        script.source = source.to_string();
        state.observers.notify_script_changed(&self.script_uuid);
        Ok(())
    }
}

impl Command for SetScriptSourceCommand {
    fn kind(&self) -> CommandKind {
        CommandKind::SetScriptSource
    }

    fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.new_source)
    }

    fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.apply(state, &self.old_source)
    }

    fn updatable(&self) -> bool {
        true
    }

    fn merge_key(&self) -> Option<MergeKey> {
        Some(MergeKey::new(&self.script_uuid, "source"))
    }

    fn update(&mut self, other: &dyn Command) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(other) => {
                self.new_source = other.new_source.clone();
                true
            }
            None => false,
        }
    }

    fn to_record(&self) -> Result<CommandRecord, CommandError> {
        encode(self.kind(), self.description(), self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use void_scene::ScriptKind;

    #[test]
    fn test_add_remove_script() {
        let mut state = EditorState::new();
        let script = Script::new("spin.js", ScriptKind::Javascript, "function update() {}");
        let id = script.id.clone();

        let mut add = AddScriptCommand::new(script);
        add.execute(&mut state).unwrap();
        assert!(state.script(&id).is_some());
        assert!(add.execute(&mut state).is_err());

        let mut remove = RemoveScriptCommand::new(&state, &id).unwrap();
        remove.execute(&mut state).unwrap();
        assert!(state.scripts.is_empty());
        remove.undo(&mut state).unwrap();
        assert_eq!(state.script_index(&id), Some(0));

        add.undo(&mut state).unwrap();
        assert!(state.scripts.is_empty());
    }

    #[test]
    fn test_set_source() {
        let mut state = EditorState::new();
        let script = Script::new("a.js", ScriptKind::Javascript, "v1");
        let id = script.id.clone();
        state.add_script(script, None);

        let mut cmd = SetScriptSourceCommand::new(&state, id.clone(), "v2").unwrap();
        cmd.execute(&mut state).unwrap();
        assert_eq!(state.script(&id).unwrap().source, "v2");
        cmd.undo(&mut state).unwrap();
        assert_eq!(state.script(&id).unwrap().source, "v1");
    }
}
