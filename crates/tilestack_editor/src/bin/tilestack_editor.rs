//! Standalone tilestack editor binary
//!
//! Run with: tilestack_editor

use bevy::prelude::*;
use std::path::PathBuf;
use tilestack_editor::preferences::EditorPreferences;
use tilestack_editor::project::EditorDocument;
use tilestack_editor::TileStackEditorPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tilestack Editor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(TileStackEditorPlugin::default())
        .add_systems(Startup, auto_open_last_project)
        .run();
}

/// System to auto-open the last project on startup if enabled in preferences
fn auto_open_last_project(
    mut document: ResMut<EditorDocument>,
    preferences: Res<EditorPreferences>,
) {
    if !preferences.auto_open_last_project {
        return;
    }

    if let Some(recent) = preferences.last_project() {
        let path = PathBuf::from(&recent.path);
        if path.exists() {
            match EditorDocument::load(&path) {
                Ok(mut loaded) => {
                    loaded
                        .project
                        .set_stroke_connectivity(preferences.stroke_connectivity);
                    *document = loaded;
                    info!("Auto-opened last project: {}", recent.name);
                }
                Err(e) => {
                    warn!("Failed to auto-open project '{}': {}", recent.name, e);
                }
            }
        } else {
            warn!(
                "Last project file not found: {} ({})",
                recent.name, recent.path
            );
        }
    }
}
