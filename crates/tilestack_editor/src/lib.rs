//! tilestack_editor - Bevy front end for the tilestack level engine
//!
//! This crate wires the level edit engine into a Bevy app:
//! - Project save/load and editor preferences
//! - Keyboard shortcuts for undo/redo, save and edit modes
//! - Pointer-driven paint and erase strokes
//! - Repaint requests whenever the current level changes
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tilestack_editor::TileStackEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TileStackEditorPlugin::default())
//!         .run();
//! }
//! ```

pub mod commands;
pub mod preferences;
pub mod project;
pub mod tools;

pub use tilestack_core;

use bevy::prelude::*;
use tilestack_core::TileRef;

use commands::{handle_keyboard_shortcuts, process_edit_actions, PendingAction};
use project::EditorDocument;
use tools::{handle_paint_input, track_level_changes, LevelWatch, StrokeInput, ViewportTransform};

/// What a primary-button drag on the level does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Select,
    Draw,
    Erase,
}

/// Global editor state
#[derive(Resource, Debug, Default)]
pub struct EditorState {
    pub mode: EditMode,
    /// Tile painted in Draw mode, chosen from the tileset palette
    pub selected_tile: Option<TileRef>,
    pub pending_action: Option<PendingAction>,
    /// Set when the level changed and the view should be redrawn
    pub needs_repaint: bool,
    pub error_message: Option<String>,
}

/// Main editor plugin
#[derive(Clone, Debug, Default)]
pub struct TileStackEditorPlugin {
    /// Edit mode on startup
    pub initial_mode: EditMode,
}

impl Plugin for TileStackEditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = preferences::EditorPreferences::load();
        bevy::log::info!("Loaded editor preferences");

        let document = EditorDocument::from_preferences(&preferences);
        let editor_state = EditorState {
            mode: self.initial_mode,
            ..Default::default()
        };

        app.insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(document)
            .init_resource::<ViewportTransform>()
            .init_resource::<StrokeInput>()
            .init_resource::<LevelWatch>()
            .add_systems(Startup, setup_editor_camera)
            .add_systems(
                Update,
                (
                    handle_keyboard_shortcuts,
                    process_edit_actions,
                    handle_paint_input,
                    track_level_changes,
                )
                    .chain(),
            );
    }
}

fn setup_editor_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
