//! Keyboard shortcut handling

use bevy::prelude::*;

use super::PendingAction;
use crate::{EditMode, EditorState};

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl {
        // Ctrl+Z - Undo
        if keyboard.just_pressed(KeyCode::KeyZ) && !shift {
            editor_state.pending_action = Some(PendingAction::Undo);
        }
        // Ctrl+Shift+Z or Ctrl+Y - Redo
        if (keyboard.just_pressed(KeyCode::KeyZ) && shift) || keyboard.just_pressed(KeyCode::KeyY) {
            editor_state.pending_action = Some(PendingAction::Redo);
        }
        // Ctrl+S - Save
        if keyboard.just_pressed(KeyCode::KeyS) {
            editor_state.pending_action = Some(PendingAction::Save);
        }
        return;
    }

    // Mode keys
    if keyboard.just_pressed(KeyCode::KeyS) {
        editor_state.pending_action = Some(PendingAction::SetMode(EditMode::Select));
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        editor_state.pending_action = Some(PendingAction::SetMode(EditMode::Draw));
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        editor_state.pending_action = Some(PendingAction::SetMode(EditMode::Erase));
    }
}
