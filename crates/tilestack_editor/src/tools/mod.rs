//! Editor tools - paint and erase strokes
//!
//! Converts pointer positions to grid cells and feeds them to the current
//! level. The level fills in the cells between samples, so a fast drag that
//! only yields a few cursor positions per frame still paints a solid line.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use tilestack_core::TileRef;
use uuid::Uuid;

use crate::project::EditorDocument;
use crate::{EditMode, EditorState};

/// Where the level is drawn inside the window
#[derive(Resource, Debug, Clone, Copy)]
pub struct ViewportTransform {
    /// Window position of the level's top-left corner, in logical pixels
    pub origin: Vec2,
    /// Unzoomed size of one cell in logical pixels
    pub tile_size: f32,
    pub zoom: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            tile_size: 32.0,
            zoom: 1.0,
        }
    }
}

impl ViewportTransform {
    fn cell_size(&self) -> f32 {
        (self.tile_size * self.zoom).max(f32::EPSILON)
    }

    /// Grid cell under a window position. Positions left of or above the
    /// level give negative coordinates, which the level ignores.
    pub fn screen_to_grid(&self, position: Vec2) -> (i32, i32) {
        let local = (position - self.origin) / self.cell_size();
        (local.x.floor() as i32, local.y.floor() as i32)
    }

    /// Window position of a cell's top-left corner
    pub fn grid_to_screen(&self, (x, y): (i32, i32)) -> Vec2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.cell_size()
    }
}

/// State of the drag in progress
#[derive(Resource, Debug, Default)]
pub struct StrokeInput {
    pub active: bool,
    /// Grid cell of the previous pointer sample
    pub last_grid_pos: Option<(i32, i32)>,
}

/// Feed one pointer sample to the current level
pub fn apply_stroke_sample(
    stroke: &mut StrokeInput,
    document: &mut EditorDocument,
    grid_pos: (i32, i32),
    tile: Option<&TileRef>,
) {
    let changed = document
        .current_level_mut()
        .paint_tiles(grid_pos, stroke.last_grid_pos, tile);
    if changed > 0 {
        document.mark_dirty();
    }
    stroke.active = true;
    stroke.last_grid_pos = Some(grid_pos);
}

/// End the drag and commit its edits as one undo step
pub fn finish_stroke(stroke: &mut StrokeInput, document: &mut EditorDocument) {
    document.current_level_mut().complete_tile_action();
    stroke.active = false;
    stroke.last_grid_pos = None;
}

/// System to paint or erase while the primary button is held
pub fn handle_paint_input(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    viewport: Res<ViewportTransform>,
    editor_state: Res<EditorState>,
    mut stroke: ResMut<StrokeInput>,
    mut document: ResMut<EditorDocument>,
) {
    let tile = match editor_state.mode {
        EditMode::Select => None,
        EditMode::Draw => editor_state.selected_tile.as_ref(),
        EditMode::Erase => None,
    };
    let can_paint = match editor_state.mode {
        EditMode::Select => false,
        EditMode::Draw => tile.is_some(),
        EditMode::Erase => true,
    };

    // Release can happen anywhere, including outside the window
    if !mouse_buttons.pressed(MouseButton::Left) || !can_paint {
        if stroke.active {
            finish_stroke(&mut stroke, &mut document);
        }
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let grid_pos = viewport.screen_to_grid(cursor);
    if stroke.last_grid_pos == Some(grid_pos) {
        return;
    }
    apply_stroke_sample(&mut stroke, &mut document, grid_pos, tile);
}

/// Last level revision the view was drawn for
#[derive(Resource, Debug, Default)]
pub struct LevelWatch {
    last_seen: Option<(Uuid, u64)>,
}

/// System to request a repaint whenever the current level changes
pub fn track_level_changes(
    document: Res<EditorDocument>,
    mut watch: ResMut<LevelWatch>,
    mut editor_state: ResMut<EditorState>,
) {
    let level = document.current_level();
    let seen = Some((level.id, level.revision()));
    if watch.last_seen != seen {
        watch.last_seen = seen;
        editor_state.needs_repaint = true;
    }
}
