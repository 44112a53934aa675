//! Integration tests for scene conversion

use std::sync::Arc;

use serde_json::json;
use void_asset_server::MemoryAssetSource;
use void_editor::core::EditorState;
use void_editor::serialization::{
    ConvertWarning, Converter, Generator, LoadOptions, Record, SceneBundle,
};
use void_scene::{
    CameraProps, Color, Geometry, Material, NodeId, NodeKind, PointLight, Projection, SceneGraph,
    SceneNode, Script, ScriptKind, ServerAssetKind, ServerAssetRef, ServerPayload,
};

const SERVER: &str = "http://assets.test";

fn options() -> LoadOptions {
    LoadOptions {
        server: SERVER.to_string(),
    }
}

fn names(scene: &SceneGraph, parent: &NodeId) -> Vec<String> {
    scene
        .children(parent)
        .iter()
        .map(|id| scene.get(id).unwrap().name.clone())
        .collect()
}

/// Scene → [Box(1,2,3) → [Lamp], Group → [A, B, C]]
fn sample_state() -> (EditorState, NodeId, NodeId) {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();

    let material = Material::standard(Color::from_hex(0xff8800));
    let mesh = SceneNode::mesh("Box", Geometry::cuboid(1.0, 2.0, 3.0), material)
        .with_position([0.0, 1.0, 0.0]);
    let box_id = state.scene.insert(&root, mesh, None).unwrap();
    let lamp = SceneNode::new("Lamp", NodeKind::PointLight(PointLight::default()));
    state.scene.insert(&box_id, lamp, None).unwrap();

    let group = state.scene.insert(&root, SceneNode::group("Group"), None).unwrap();
    for name in ["A", "B", "C"] {
        state.scene.insert(&group, SceneNode::group(name), None).unwrap();
    }
    state.scripts.push(Script::new("main.js", ScriptKind::Javascript, "// noop"));
    (state, box_id, group)
}

fn server_ref(url: &str, kind: ServerAssetKind) -> ServerAssetRef {
    ServerAssetRef {
        id: "asset-1".to_string(),
        url: url.to_string(),
        kind,
    }
}

#[tokio::test]
async fn test_round_trip_preserves_variants_and_shape() {
    let (state, box_id, group) = sample_state();
    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));

    let written = converter.to_json(&state).unwrap();
    assert!(written.warnings.is_empty());

    // Through JSON text, as a saved file would be.
    let text = serde_json::to_string(&written.value).unwrap();
    let records: Vec<Record> = serde_json::from_str(&text).unwrap();

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    let bundle = loaded.value;

    assert_eq!(bundle.options.as_ref(), Some(&state.options));
    assert_eq!(bundle.camera.as_ref(), Some(&state.camera));
    assert_eq!(bundle.renderer.as_ref(), Some(&state.renderer));
    assert_eq!(bundle.scripts, state.scripts);

    let scene = &bundle.scene;
    assert_eq!(scene.len(), state.scene.len());
    assert_eq!(scene.root_id(), state.scene.root_id());
    assert_eq!(names(scene, scene.root_id()), vec!["Box", "Group"]);
    assert_eq!(names(scene, &group), vec!["A", "B", "C"]);
    assert_eq!(names(scene, &box_id), vec!["Lamp"]);

    let mesh = scene.get(&box_id).unwrap();
    assert_eq!(mesh.geometry(), Some(&Geometry::cuboid(1.0, 2.0, 3.0)));
    assert_eq!(mesh.transform.position, [0.0, 1.0, 0.0]);
    for node in state.scene.iter_preorder() {
        assert_eq!(scene.get(&node.id), Some(node));
    }
}

#[tokio::test]
async fn test_record_order_does_not_matter() {
    let (state, _, group) = sample_state();
    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));
    let mut records = converter.to_json(&state).unwrap().value;
    records.reverse();

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(names(&loaded.value.scene, &group), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_missing_child_yields_one_warning() {
    let (state, _, group) = sample_state();
    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));
    let mut records = converter.to_json(&state).unwrap().value;

    let b = state.scene.children(&group)[1].clone();
    records.retain(|r| r.id != b);

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert_eq!(
        loaded.warnings,
        vec![ConvertWarning::MissingChild {
            parent: group.clone(),
            child: b,
        }]
    );
    assert_eq!(names(&loaded.value.scene, &group), vec!["A", "C"]);
}

#[tokio::test]
async fn test_failed_server_child_is_skipped() {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();
    let parent = state.scene.insert(&root, SceneNode::group("Holder"), None).unwrap();
    let chair = SceneNode::server_object("Chair", &server_ref("/Upload/Model/chair.json", ServerAssetKind::Model));
    let chair_id = state.scene.insert(&parent, chair, None).unwrap();
    state.scene.insert(&chair_id, SceneNode::group("Cushion"), None).unwrap();

    // Nothing is served, so the fetch fails.
    let source = Arc::new(MemoryAssetSource::new());
    let converter = Converter::new(source.clone());
    let records = converter.to_json(&state).unwrap().value;

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert_eq!(source.request_count(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(matches!(
        &loaded.warnings[0],
        ConvertWarning::ServerObjectFailed { id, .. } if *id == chair_id
    ));

    let scene = &loaded.value.scene;
    assert!(scene.contains(&parent));
    assert!(scene.children(&parent).is_empty());
    assert_eq!(scene.len(), 2);
}

#[tokio::test]
async fn test_server_child_attached_before_its_children() {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();
    let chair = SceneNode::server_object("Chair", &server_ref("/Upload/Model/chair.json", ServerAssetKind::Model));
    let chair_id = state.scene.insert(&root, chair, None).unwrap();
    state.scene.insert(&chair_id, SceneNode::group("Cushion"), None).unwrap();

    let source = Arc::new(MemoryAssetSource::new());
    source.insert(
        format!("{}/Upload/Model/chair.json", SERVER),
        br#"{"name":"chair","geometry":{"type":"BoxGeometry","width":1.0,"height":1.0,"depth":1.0}}"#.to_vec(),
    );
    let converter = Converter::new(source);
    let records = converter.to_json(&state).unwrap().value;
    let server_record = records.iter().find(|r| r.id == chair_id).unwrap();
    assert_eq!(server_record.generator(), Some(Generator::ServerObject));

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert!(loaded.warnings.is_empty());
    let scene = &loaded.value.scene;
    let chair = scene.get(&chair_id).unwrap();
    assert!(chair.is_server_owned());
    match &chair.kind {
        NodeKind::ServerObject(object) => {
            assert!(matches!(object.payload, Some(ServerPayload::Model { .. })))
        }
        other => panic!("unexpected kind {:?}", other),
    }
    assert_eq!(names(scene, &chair_id), vec!["Cushion"]);
}

#[tokio::test]
async fn test_camera_node_is_skipped_with_warning() {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();
    let camera = SceneNode::new(
        "Security Cam",
        NodeKind::Camera(CameraProps {
            projection: Projection::default(),
        }),
    );
    let camera_id = state.scene.insert(&root, camera, None).unwrap();
    let lens = state.scene.insert(&camera_id, SceneNode::group("Lens"), None).unwrap();

    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));
    let written = converter.to_json(&state).unwrap();
    assert_eq!(written.warnings.len(), 1);
    assert!(matches!(
        &written.warnings[0],
        ConvertWarning::NoSerializer { type_name, .. } if type_name == "PerspectiveCamera"
    ));
    // Children of the skipped node are still written.
    assert!(written.value.iter().any(|r| r.id == lens));

    let loaded = converter.from_json(&written.value, &options()).await.unwrap();
    assert_eq!(
        loaded.warnings,
        vec![ConvertWarning::MissingChild {
            parent: root,
            child: camera_id,
        }]
    );
}

#[tokio::test]
async fn test_unknown_and_misplaced_generators_warn() {
    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));
    let mut records = converter.to_json(&SceneBundle::default()).unwrap().value;
    let root = records[0].id.clone();

    records.push(
        serde_json::from_value(json!({
            "id": "mystery",
            "metadata": { "generator": "TeapotSerializer", "type": "Teapot" }
        }))
        .unwrap(),
    );
    records.push(
        serde_json::from_value(json!({
            "id": "stray-script",
            "metadata": { "generator": "ScriptSerializer", "type": "Script" },
            "name": "stray.js",
            "type": "javascript",
            "source": ""
        }))
        .unwrap(),
    );
    records[0].children = vec![NodeId::from("mystery"), NodeId::from("stray-script")];

    let loaded = converter.from_json(&records, &options()).await.unwrap();
    let scene_warnings: Vec<_> = loaded
        .warnings
        .iter()
        .filter(|w| !matches!(w, ConvertWarning::MissingSection(_)))
        .collect();
    assert_eq!(scene_warnings.len(), 2);
    assert!(matches!(scene_warnings[0], ConvertWarning::UnknownGenerator { .. }));
    assert!(matches!(
        scene_warnings[1],
        ConvertWarning::NotASceneNode { generator: Generator::Script, .. }
    ));
    assert_eq!(loaded.value.scene.len(), 1);
    assert_eq!(loaded.value.scene.root_id(), &root);
}

#[tokio::test]
async fn test_unflagged_server_record_saves_again() {
    let records: Vec<Record> = serde_json::from_value(json!([
        {
            "id": "root",
            "metadata": { "generator": "SceneSerializer", "type": "Scene" },
            "children": ["statue"],
            "name": "Scene"
        },
        {
            "id": "statue",
            "metadata": { "generator": "ServerObject", "type": "ServerObject" },
            "name": "Statue",
            "userData": { "ID": "statue-1", "Url": "/Upload/Model/statue.json", "Type": "Model" }
        }
    ]))
    .unwrap();

    let source = Arc::new(MemoryAssetSource::new());
    source.insert(
        format!("{}/Upload/Model/statue.json", SERVER),
        br#"{"name":"statue","geometry":{"type":"BoxGeometry","width":1.0,"height":2.0,"depth":1.0}}"#.to_vec(),
    );
    let converter = Converter::new(source);
    let loaded = converter.from_json(&records, &options()).await.unwrap();
    assert_eq!(loaded.value.scene.len(), 2);

    let resaved = converter.to_json(&loaded.value).unwrap();
    assert!(resaved
        .warnings
        .iter()
        .all(|w| matches!(w, ConvertWarning::MissingSection(_))));
    let statue = resaved
        .value
        .iter()
        .find(|r| r.id == NodeId::from("statue"))
        .unwrap();
    assert_eq!(statue.generator(), Some(Generator::ServerObject));
    assert_eq!(statue.fields["userData"]["Server"], json!(true));
    assert_eq!(statue.fields["userData"]["Url"], json!("/Upload/Model/statue.json"));

    let reloaded = converter.from_json(&resaved.value, &options()).await.unwrap();
    assert!(reloaded.value.scene.get(&NodeId::from("statue")).unwrap().is_server_owned());
}

#[test]
fn test_server_object_without_reference_is_skipped() {
    let mut state = EditorState::new();
    let root = state.scene.root_id().clone();
    let bare = SceneNode::new("Bare", NodeKind::ServerObject(Default::default()));
    let bare_id = state.scene.insert(&root, bare, None).unwrap();

    let converter = Converter::new(Arc::new(MemoryAssetSource::new()));
    let written = converter.to_json(&state).unwrap();
    assert_eq!(written.warnings.len(), 1);
    assert!(matches!(
        &written.warnings[0],
        ConvertWarning::ServerObjectFailed { id, .. } if *id == bare_id
    ));
    assert!(written.value.iter().all(|r| r.id != bare_id));
}
