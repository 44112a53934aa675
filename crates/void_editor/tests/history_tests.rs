//! Integration tests for commands and undo history

use std::sync::{Arc, Mutex};
use std::time::Duration;

use void_editor::commands::{
    AddObjectCommand, MoveObjectCommand, RemoveObjectCommand, SetColorCommand,
    SetPositionCommand, SetValueCommand,
};
use void_editor::core::{EditorState, History, HistoryRecord, MergePolicy};
use void_scene::{Color, Geometry, Material, NodeId, SceneNode};

fn state_with_mesh() -> (EditorState, NodeId) {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();
    let mesh = SceneNode::mesh("Box", Geometry::cuboid(1.0, 2.0, 3.0), Material::default());
    let id = state.scene.insert(&root, mesh, None).unwrap();
    (state, id)
}

fn position(state: &EditorState, id: &NodeId) -> [f32; 3] {
    state.object_by_id(id).unwrap().transform.position
}

#[test]
fn test_set_color_undo_restores_previous() {
    let (mut state, id) = state_with_mesh();
    state
        .object_by_id_mut(&id)
        .unwrap()
        .set_color("color", Color::from_hex(0xff0000))
        .unwrap();
    let mut history = History::new();

    let green = SetColorCommand::new(&state, id.clone(), "color", Color::from_hex(0x00ff00)).unwrap();
    history.execute(Box::new(green), &mut state).unwrap();
    assert_eq!(
        state.object_by_id(&id).unwrap().color("color"),
        Some(Color::from_hex(0x00ff00))
    );

    assert!(history.undo(&mut state).unwrap());
    assert_eq!(
        state.object_by_id(&id).unwrap().color("color"),
        Some(Color::from_hex(0xff0000))
    );
    assert!(history.redo(&mut state).unwrap());
    assert_eq!(
        state.object_by_id(&id).unwrap().color("color"),
        Some(Color::from_hex(0x00ff00))
    );
}

#[test]
fn test_consecutive_moves_coalesce() {
    let (mut state, id) = state_with_mesh();
    let mut history = History::new();
    history.set_merge_window(Some(Duration::from_secs(60)));

    let first = SetPositionCommand::new(&state, id.clone(), [1.0, 0.0, 0.0]).unwrap();
    history.execute(Box::new(first), &mut state).unwrap();
    let second = SetPositionCommand::new(&state, id.clone(), [2.0, 0.0, 0.0]).unwrap();
    history.execute(Box::new(second), &mut state).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(position(&state, &id), [2.0, 0.0, 0.0]);

    history.undo(&mut state).unwrap();
    assert_eq!(position(&state, &id), [0.0, 0.0, 0.0]);
    assert!(!history.can_undo());
}

#[test]
fn test_merge_disabled_by_policy_target() {
    let (mut state, id) = state_with_mesh();
    let root = state.scene.root_id().clone();
    let other = state.scene.insert(&root, SceneNode::group("Other"), None).unwrap();
    let mut history = History::new();
    history.set_merge_window(None);
    history.set_merge_policy(MergePolicy::SameTarget);

    let a = SetPositionCommand::new(&state, id, [1.0, 0.0, 0.0]).unwrap();
    history.execute(Box::new(a), &mut state).unwrap();
    let b = SetPositionCommand::new(&state, other, [1.0, 0.0, 0.0]).unwrap();
    history.execute(Box::new(b), &mut state).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn test_execute_after_undo_discards_redo_branch() {
    let (mut state, id) = state_with_mesh();
    let mut history = History::new();
    history.set_merge_window(None);
    history.set_merge_policy(MergePolicy::SameTarget);

    let a = SetValueCommand::new(&state, id.clone(), "name", "A").unwrap();
    history.execute(Box::new(a), &mut state).unwrap();
    let b = SetValueCommand::new(&state, id.clone(), "visible", false).unwrap();
    history.execute(Box::new(b), &mut state).unwrap();

    history.undo(&mut state).unwrap();
    history.undo(&mut state).unwrap();
    assert_eq!(history.cursor(), 0);
    assert!(history.can_redo());

    let c = SetValueCommand::new(&state, id.clone(), "castShadow", true).unwrap();
    history.execute(Box::new(c), &mut state).unwrap();

    assert_eq!(history.len(), 1);
    assert!(!history.can_redo());
    assert!(!history.redo(&mut state).unwrap());
    let node = state.object_by_id(&id).unwrap();
    assert_eq!(node.name, "Box");
    assert!(node.visible);
    assert!(node.cast_shadow);
}

#[test]
fn test_history_persists_through_records() {
    let (mut state, id) = state_with_mesh();
    let root = state.scene.root_id().clone();
    let mut history = History::new();
    history.set_merge_window(None);

    let group = SceneNode::group("Folder");
    let add = AddObjectCommand::new(&state, root.clone(), group).unwrap();
    let folder = add.object_uuid().cloned().unwrap();
    history.execute(Box::new(add), &mut state).unwrap();
    let mv = MoveObjectCommand::new(&state, id.clone(), folder.clone(), None).unwrap();
    history.execute(Box::new(mv), &mut state).unwrap();
    let color = SetColorCommand::new(&state, id.clone(), "color", Color::from_hex(0x123456)).unwrap();
    history.execute(Box::new(color), &mut state).unwrap();
    history.undo(&mut state).unwrap();

    let record = history.to_json().unwrap();
    assert_eq!(record.undos.len(), 2);
    assert_eq!(record.redos.len(), 1);
    let text = serde_json::to_string(&record).unwrap();
    assert!(text.contains("\"type\":\"AddObjectCommand\""));
    assert!(text.contains("\"objectUuid\""));

    let parsed: HistoryRecord = serde_json::from_str(&text).unwrap();
    let mut restored = History::new();
    restored.from_json(&parsed).unwrap();
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.cursor(), 2);
    assert_eq!(restored.ids(), history.ids());
    assert_eq!(restored.undo_description(), Some("Move Object"));

    // Restored commands act on the live scene by id.
    restored.redo(&mut state).unwrap();
    assert_eq!(
        state.object_by_id(&id).unwrap().color("color"),
        Some(Color::from_hex(0x123456))
    );
    restored.undo(&mut state).unwrap();
    restored.undo(&mut state).unwrap();
    assert_eq!(state.scene.parent(&id), Some(&root));
    restored.undo(&mut state).unwrap();
    assert!(state.object_by_id(&folder).is_none());

    restored.redo(&mut state).unwrap();
    assert_eq!(state.object_by_id(&folder).unwrap().name, "Folder");
}

#[test]
fn test_transaction_is_one_step() {
    let (mut state, id) = state_with_mesh();
    let mut history = History::new();

    history.begin_transaction("Reset Box");
    let mv = SetPositionCommand::new(&state, id.clone(), [5.0, 5.0, 5.0]).unwrap();
    history.execute(Box::new(mv), &mut state).unwrap();
    let rename = SetValueCommand::new(&state, id.clone(), "name", "Crate").unwrap();
    history.execute(Box::new(rename), &mut state).unwrap();
    history.commit_transaction();

    assert_eq!(history.len(), 1);
    assert_eq!(history.undo_description(), Some("Reset Box"));
    history.undo(&mut state).unwrap();
    let node = state.object_by_id(&id).unwrap();
    assert_eq!(node.name, "Box");
    assert_eq!(node.transform.position, [0.0, 0.0, 0.0]);
}

#[test]
fn test_observers_fire_on_execute_and_undo() {
    let (mut state, id) = state_with_mesh();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let graph_changes = Arc::new(Mutex::new(0usize));

    let sink = seen.clone();
    state.observers.on_object_changed(move |id| sink.lock().unwrap().push(id.clone()));
    let counter = graph_changes.clone();
    state.observers.on_scene_graph_changed(move || *counter.lock().unwrap() += 1);

    let mut history = History::new();
    let cmd = SetPositionCommand::new(&state, id.clone(), [0.0, 3.0, 0.0]).unwrap();
    history.execute(Box::new(cmd), &mut state).unwrap();
    history.undo(&mut state).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![id.clone(), id.clone()]);

    let remove = RemoveObjectCommand::new(&state, id).unwrap();
    history.execute(Box::new(remove), &mut state).unwrap();
    assert_eq!(*graph_changes.lock().unwrap(), 1);
}
