//! Editor commands
//!
//! UI widgets and shortcuts queue a [`PendingAction`]; one system applies it
//! to the current level so every edit goes through the level's own methods.

mod shortcuts;

pub use shortcuts::handle_keyboard_shortcuts;

use bevy::prelude::*;
use tilestack_core::LayerId;

use crate::preferences::EditorPreferences;
use crate::project::EditorDocument;
use crate::{EditMode, EditorState};

/// An edit requested by the UI, applied on the next update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Undo,
    Redo,
    Save,
    SetMode(EditMode),
    /// Add an empty layer; `None` picks a default name
    AddLayer(Option<String>),
    DeleteLayer(LayerId),
    ShiftLayer { layer: LayerId, up: bool },
    RenameLayer { layer: LayerId, name: String },
    SelectLayer(Option<LayerId>),
    /// Resize the current level around the project's anchor
    ResizeLevel { width: u32, height: u32 },
}

/// System to process edit-related pending actions
pub fn process_edit_actions(
    mut editor_state: ResMut<EditorState>,
    mut document: ResMut<EditorDocument>,
    preferences: Option<ResMut<EditorPreferences>>,
) {
    let Some(action) = editor_state.pending_action.take() else {
        return;
    };

    let changed = match action {
        PendingAction::Undo => document.current_level_mut().undo(),
        PendingAction::Redo => document.current_level_mut().redo(),
        PendingAction::Save => {
            match document.save_current() {
                Ok(()) => {
                    bevy::log::info!("Saved project '{}'", document.name());
                    if let (Some(mut preferences), Some(path)) =
                        (preferences, document.path.as_ref())
                    {
                        preferences.add_recent_project(path.to_string_lossy(), document.name());
                        if let Err(e) = preferences.save() {
                            bevy::log::error!("Failed to save preferences: {}", e);
                        }
                    }
                }
                Err(e) => {
                    bevy::log::error!("Failed to save project: {}", e);
                    editor_state.error_message = Some(format!("Failed to save project: {}", e));
                }
            }
            false
        }
        PendingAction::SetMode(mode) => {
            editor_state.mode = mode;
            false
        }
        PendingAction::AddLayer(name) => {
            document.current_level_mut().add_new_layer(name.as_deref());
            true
        }
        PendingAction::DeleteLayer(layer) => document.current_level_mut().delete_layer(layer),
        PendingAction::ShiftLayer { layer, up } => {
            document.current_level_mut().shift_layer(layer, up)
        }
        PendingAction::RenameLayer { layer, name } => {
            document.current_level_mut().rename_layer(layer, name)
        }
        PendingAction::SelectLayer(layer) => {
            if let Err(e) = document.current_level_mut().set_current_layer(layer) {
                editor_state.error_message = Some(e.to_string());
            }
            false
        }
        PendingAction::ResizeLevel { width, height } => {
            match document.project.resize_current_level(width, height) {
                Ok(resized) => resized,
                Err(e) => {
                    editor_state.error_message = Some(e.to_string());
                    false
                }
            }
        }
    };

    if changed {
        document.mark_dirty();
    }
}
