//! Session checker
//!
//! Loads a saved editor session, resolving server objects against the
//! configured asset server, and prints the resulting scene tree together
//! with any conversion warnings.
//!
//! Run with: cargo run --bin void_session_check -- <session.json> [--config <path>] [--resave <path>]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use void_editor::core::EditorConfig;
use void_editor::{Editor, EditorError};
use void_scene::{NodeId, SceneGraph};

struct Args {
    session: PathBuf,
    config: Option<PathBuf>,
    resave: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let mut args = std::env::args().skip(1);
    let mut session = None;
    let mut config = None;
    let mut resave = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next()?)),
            "--resave" => resave = Some(PathBuf::from(args.next()?)),
            _ if session.is_none() => session = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }
    Some(Args {
        session: session?,
        config,
        resave,
    })
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, EditorError> {
    match path {
        Some(path) => Ok(EditorConfig::load(path)?),
        None => match EditorConfig::default_path().filter(|p| p.exists()) {
            Some(path) => {
                log::info!("Using config {}", path.display());
                Ok(EditorConfig::load(&path)?)
            }
            None => Ok(EditorConfig::default()),
        },
    }
}

fn print_tree(scene: &SceneGraph, id: &NodeId, depth: usize) {
    if let Some(node) = scene.get(id) {
        println!("{}{} [{}] {}", "  ".repeat(depth), node.name, node.type_name(), node.id);
        for child in scene.children(id) {
            print_tree(scene, child, depth + 1);
        }
    }
}

fn run(args: Args) -> Result<usize, EditorError> {
    let config = load_config(args.config.as_deref())?;
    let mut editor = Editor::new(config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let warnings = runtime.block_on(editor.load_from_path(&args.session))?;

    let scene = &editor.state.scene;
    print_tree(scene, scene.root_id(), 0);
    println!();
    println!(
        "{} nodes, {} scripts, {} undo / {} redo",
        scene.len(),
        editor.state.scripts.len(),
        editor.history.cursor(),
        editor.history.len() - editor.history.cursor()
    );
    for warning in &warnings {
        println!("warning: {}", warning);
    }

    if let Some(path) = &args.resave {
        editor.save_to_path(path)?;
        log::info!("Re-saved session to {}", path.display());
    }
    Ok(warnings.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args() else {
        eprintln!("usage: void_session_check <session.json> [--config <path>] [--resave <path>]");
        return ExitCode::from(2);
    };

    match run(args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(3),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
