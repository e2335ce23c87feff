//! Level containing a stack of tile layers and its edit history

use crate::history::{CellEdit, EditRecord, History};
use crate::layer::cell_count;
use crate::stroke::{clip_start, line_cells, StrokeConnectivity};
use crate::{EditError, Layer, LayerId, ResizeAnchor, TileRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Grid and layer state that history records are replayed against
#[derive(Debug, Clone)]
pub(crate) struct LevelContent {
    width: u32,
    height: u32,
    /// Layer sequence, back to front
    order: Vec<LayerId>,
    /// Layers in the sequence plus deleted layers history can still restore
    layers: HashMap<LayerId, Layer>,
    current: Option<LayerId>,
}

impl LevelContent {
    pub(crate) fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Replace the layer sequence, dropping the selection if its layer left
    pub(crate) fn set_order(&mut self, order: Vec<LayerId>) {
        self.order = order;
        if let Some(current) = self.current {
            if !self.order.contains(&current) {
                self.current = None;
            }
        }
    }

    pub(crate) fn rename(&mut self, id: LayerId, name: &str) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.rename(name);
        }
    }

    /// Resize every stored layer, including detached ones, so a layer
    /// restored later always matches the level
    pub(crate) fn resize(&mut self, width: u32, height: u32, anchor: ResizeAnchor) {
        for layer in self.layers.values_mut() {
            layer.resize(width, height, anchor);
        }
        self.width = width;
        self.height = height;
    }

    /// Painted cells each stored layer would lose to a resize
    fn cropped_cells(
        &self,
        width: u32,
        height: u32,
        anchor: ResizeAnchor,
    ) -> Vec<(LayerId, Vec<CellEdit>)> {
        self.layers
            .iter()
            .map(|(id, layer)| (*id, layer.cropped_cells(width, height, anchor)))
            .filter(|(_, cells)| !cells.is_empty())
            .collect()
    }
}

/// Cell edits of the drag in progress
#[derive(Debug, Clone)]
struct PendingStroke {
    layer: LayerId,
    edits: Vec<CellEdit>,
}

/// A level: a sized stack of layers plus undo/redo history.
///
/// Every mutating call bumps [`Level::revision`], which the UI watches to know
/// when to repaint.
#[derive(Debug, Clone)]
pub struct Level {
    pub id: Uuid,
    pub name: String,
    content: LevelContent,
    history: History,
    pending_stroke: Option<PendingStroke>,
    connectivity: StrokeConnectivity,
    revision: u64,
}

impl Level {
    /// Create an empty level with no layers
    pub fn new(width: u32, height: u32) -> Self {
        Self::named("Untitled", width, height)
    }

    /// Create an empty named level
    pub fn named(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: LevelContent {
                width,
                height,
                order: Vec::new(),
                layers: HashMap::new(),
                current: None,
            },
            history: History::new(),
            pending_stroke: None,
            connectivity: StrokeConnectivity::default(),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.content.width
    }

    pub fn height(&self) -> u32 {
        self.content.height
    }

    /// Counter bumped after every observable change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn stroke_connectivity(&self) -> StrokeConnectivity {
        self.connectivity
    }

    pub fn set_stroke_connectivity(&mut self, connectivity: StrokeConnectivity) {
        self.connectivity = connectivity;
    }

    // --- Layer queries ---

    /// Layer handles back to front
    pub fn layer_ids(&self) -> &[LayerId] {
        &self.content.order
    }

    /// Layers back to front
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.content
            .order
            .iter()
            .filter_map(|id| self.content.layers.get(id))
    }

    pub fn layer_count(&self) -> usize {
        self.content.order.len()
    }

    pub fn contains_layer(&self, id: LayerId) -> bool {
        self.content.order.contains(&id)
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.content.order.iter().position(|l| *l == id)
    }

    /// Get a layer in the sequence
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        if !self.contains_layer(id) {
            return None;
        }
        self.content.layers.get(&id)
    }

    /// The selected layer, if any
    pub fn current_layer(&self) -> Option<LayerId> {
        self.content.current
    }

    /// Get tile at position for a specific layer
    pub fn tile(&self, layer: LayerId, x: u32, y: u32) -> Option<&TileRef> {
        self.layer(layer).and_then(|l| l.tile(x, y))
    }

    // --- Layer management ---

    /// Add a layer on top of the stack. Selects it if nothing was selected.
    ///
    /// Returns `Ok(false)` if the layer is already part of this level.
    pub fn add_layer(&mut self, layer: Layer) -> Result<bool, EditError> {
        let id = layer.id();
        if self.content.layers.contains_key(&id) {
            return Ok(false);
        }
        if layer.width() != self.width() || layer.height() != self.height() {
            let err = EditError::MalformedLayer {
                name: layer.name().to_string(),
                expected: self.width() as usize * self.height() as usize,
                actual: layer.tiles().len(),
            };
            tracing::error!("Cannot add layer: {}", err);
            return Err(err);
        }

        self.insert_layer(layer);
        Ok(true)
    }

    fn insert_layer(&mut self, layer: Layer) {
        let id = layer.id();
        self.complete_tile_action();
        let before = self.content.order.clone();
        self.content.layers.insert(id, layer);
        self.content.order.push(id);
        if self.content.current.is_none() {
            self.content.current = Some(id);
        }
        let after = self.content.order.clone();
        self.record(EditRecord::LayerSet { before, after });
        self.notify_changed();
    }

    /// Create and add an empty layer. A blank name becomes "layer N".
    pub fn add_new_layer(&mut self, name: Option<&str>) -> LayerId {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("layer {}", self.layer_count() + 1),
        };
        let layer = Layer::new(name, self.width(), self.height());
        let id = layer.id();
        self.insert_layer(layer);
        id
    }

    /// Remove a layer from the stack. It stays restorable through undo.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layer_index(id) else {
            return false;
        };

        self.complete_tile_action();
        if self.content.current == Some(id) {
            self.content.current = None;
        }
        let before = self.content.order.clone();
        self.content.order.remove(index);
        let after = self.content.order.clone();
        self.record(EditRecord::LayerSet { before, after });
        self.notify_changed();
        true
    }

    /// Swap a layer with its neighbour. `up` moves it one step toward the
    /// front (the end of the sequence).
    pub fn shift_layer(&mut self, id: LayerId, up: bool) -> bool {
        let Some(index) = self.layer_index(id) else {
            tracing::error!("Cannot shift layer: {}", EditError::UnknownLayer(id));
            return false;
        };
        if (up && index + 1 >= self.layer_count()) || (!up && index == 0) {
            return false;
        }
        let new_index = if up { index + 1 } else { index - 1 };

        self.complete_tile_action();
        let before = self.content.order.clone();
        self.content.order.swap(index, new_index);
        let after = self.content.order.clone();
        self.record(EditRecord::LayerSet { before, after });
        self.notify_changed();
        true
    }

    pub fn rename_layer(&mut self, id: LayerId, new_name: impl Into<String>) -> bool {
        let new_name = new_name.into();
        let Some(old_name) = self.layer(id).map(|l| l.name().to_string()) else {
            return false;
        };
        if old_name == new_name {
            return false;
        }

        self.complete_tile_action();
        self.content.rename(id, &new_name);
        self.record(EditRecord::Rename {
            layer: id,
            old_name,
            new_name,
        });
        self.notify_changed();
        true
    }

    /// Select a layer, or clear the selection with `None`. Not undoable.
    pub fn set_current_layer(&mut self, id: Option<LayerId>) -> Result<(), EditError> {
        if let Some(id) = id {
            if !self.contains_layer(id) {
                let err = EditError::UnknownLayer(id);
                tracing::error!("Cannot select layer: {}", err);
                return Err(err);
            }
        }
        self.content.current = id;
        self.notify_changed();
        Ok(())
    }

    // --- Painting ---

    fn in_bounds(&self, (x, y): (i32, i32)) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Paint (`Some(tile)`) or erase (`None`) the cells between the previous
    /// pointer sample and the new one on the current layer.
    ///
    /// Samples outside the grid are ignored, and cells that already hold
    /// `tile` are skipped. Changes accumulate until [`complete_tile_action`]
    /// turns them into one undo step. Returns the number of cells changed.
    ///
    /// [`complete_tile_action`]: Level::complete_tile_action
    pub fn paint_tiles(
        &mut self,
        new_pos: (i32, i32),
        prev_pos: Option<(i32, i32)>,
        tile: Option<&TileRef>,
    ) -> usize {
        let Some(layer_id) = self.content.current else {
            return 0;
        };
        if !self.in_bounds(new_pos) {
            return 0;
        }
        if self
            .pending_stroke
            .as_ref()
            .is_some_and(|s| s.layer != layer_id)
        {
            self.complete_tile_action();
        }

        let cells = match prev_pos {
            Some(prev) if prev != new_pos => {
                let start = clip_start(prev, new_pos, self.width(), self.height());
                line_cells(start, new_pos, self.connectivity)
            }
            _ => vec![new_pos],
        };

        let Some(layer) = self.content.layers.get_mut(&layer_id) else {
            return 0;
        };
        let stroke = self.pending_stroke.get_or_insert_with(|| PendingStroke {
            layer: layer_id,
            edits: Vec::new(),
        });

        let mut changed = 0;
        for (x, y) in cells {
            if x < 0 || y < 0 {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            if !layer.in_bounds(x, y) || layer.tile(x, y) == tile {
                continue;
            }
            if let Ok(old_tile) = layer.set_tile(x, y, tile.cloned()) {
                stroke.edits.push(CellEdit {
                    x,
                    y,
                    old_tile,
                    new_tile: tile.cloned(),
                });
                changed += 1;
            }
        }

        if changed > 0 {
            self.notify_changed();
        }
        changed
    }

    /// Commit the stroke in progress as a single history entry. Called when
    /// the pointer is released. Returns whether anything was recorded.
    pub fn complete_tile_action(&mut self) -> bool {
        let Some(stroke) = self.pending_stroke.take() else {
            return false;
        };
        if stroke.edits.is_empty() {
            return false;
        }
        self.record(EditRecord::Stroke {
            layer: stroke.layer,
            edits: stroke.edits,
        });
        self.notify_changed();
        true
    }

    /// Number of cell edits waiting for [`Level::complete_tile_action`]
    pub fn pending_edit_count(&self) -> usize {
        self.pending_stroke.as_ref().map_or(0, |s| s.edits.len())
    }

    // --- Resize ---

    /// Resize the level and all of its layers around `anchor`.
    ///
    /// `should_record` is false when replaying history. Returns false when
    /// the size is unchanged, empty or above [`MAX_LEVEL_CELLS`].
    ///
    /// [`MAX_LEVEL_CELLS`]: crate::MAX_LEVEL_CELLS
    pub fn resize(
        &mut self,
        new_width: u32,
        new_height: u32,
        anchor: ResizeAnchor,
        should_record: bool,
    ) -> bool {
        if new_width == self.width() && new_height == self.height() {
            return false;
        }
        if cell_count(new_width, new_height).is_none() {
            tracing::error!(
                "Ignoring resize: {}",
                EditError::InvalidDimensions {
                    width: new_width,
                    height: new_height
                }
            );
            return false;
        }

        self.complete_tile_action();
        let (old_width, old_height) = (self.width(), self.height());
        let cropped = if should_record {
            self.content.cropped_cells(new_width, new_height, anchor)
        } else {
            Vec::new()
        };
        self.content.resize(new_width, new_height, anchor);
        if should_record {
            self.record(EditRecord::Resize {
                old_width,
                old_height,
                new_width,
                new_height,
                anchor,
                cropped,
            });
        }
        tracing::info!(
            "Resized level '{}' from {}x{} to {}x{} ({})",
            self.name,
            old_width,
            old_height,
            new_width,
            new_height,
            anchor.display_name()
        );
        self.notify_changed();
        true
    }

    // --- History ---

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.pending_edit_count() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && self.pending_edit_count() == 0
    }

    /// Revert the last applied record. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.complete_tile_action();
        let Some(record) = self.history.step_back() else {
            return false;
        };
        tracing::debug!("Undo: {}", record.label());
        record.revert(&mut self.content);
        self.notify_changed();
        true
    }

    /// Re-apply the next undone record. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.complete_tile_action();
        let Some(record) = self.history.step_forward() else {
            return false;
        };
        tracing::debug!("Redo: {}", record.label());
        record.apply(&mut self.content);
        self.notify_changed();
        true
    }

    fn record(&mut self, record: EditRecord) {
        let discarded = self.history.record(record);
        if !discarded.is_empty() {
            tracing::debug!("Discarded {} undone history entries", discarded.len());
            self.release_detached_layers();
        }
    }

    /// Drop deleted layers that no remaining history entry can restore
    fn release_detached_layers(&mut self) {
        let order = &self.content.order;
        let history = &self.history;
        self.content
            .layers
            .retain(|id, _| order.contains(id) || history.references(*id));
    }

    /// Number of layers held for the sequence and for history
    pub fn stored_layer_count(&self) -> usize {
        self.content.layers.len()
    }

    // --- Snapshots ---

    /// Capture the persistable state: every layer's full grid and name
    pub fn to_data(&self) -> LevelData {
        LevelData {
            name: self.name.clone(),
            width: self.width(),
            height: self.height(),
            layers: self
                .layers()
                .map(|layer| LayerData {
                    name: layer.name().to_string(),
                    tiles: layer.tiles().to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuild a level from a snapshot. History starts empty and the first
    /// layer is selected.
    pub fn from_data(data: LevelData) -> Result<Self, EditError> {
        let Some(expected) = cell_count(data.width, data.height) else {
            return Err(EditError::InvalidDimensions {
                width: data.width,
                height: data.height,
            });
        };

        let mut level = Level::named(data.name, data.width, data.height);
        for layer_data in data.layers {
            if layer_data.tiles.len() != expected {
                return Err(EditError::MalformedLayer {
                    name: layer_data.name,
                    expected,
                    actual: layer_data.tiles.len(),
                });
            }
            let layer =
                Layer::from_tiles(layer_data.name, data.width, data.height, layer_data.tiles);
            let id = layer.id();
            level.content.layers.insert(id, layer);
            level.content.order.push(id);
        }
        level.content.current = level.content.order.first().copied();
        Ok(level)
    }
}

/// Serializable level snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Back to front
    pub layers: Vec<LayerData>,
}

/// Serializable layer snapshot, row-major cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerData {
    pub name: String,
    pub tiles: Vec<Option<TileRef>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t1() -> TileRef {
        TileRef::new("terrain", 1)
    }

    fn t2() -> TileRef {
        TileRef::new("terrain", 2)
    }

    fn filled(level: &Level, layer: LayerId) -> Vec<(u32, u32)> {
        let mut cells = Vec::new();
        for y in 0..level.height() {
            for x in 0..level.width() {
                if level.tile(layer, x, y).is_some() {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    #[test]
    fn test_new_level() {
        let level = Level::new(10, 8);
        assert_eq!(level.width(), 10);
        assert_eq!(level.height(), 8);
        assert_eq!(level.layer_count(), 0);
        assert_eq!(level.current_layer(), None);
        assert!(level.history().is_empty());
    }

    #[test]
    fn test_stroke_scenario() {
        let mut level = Level::new(10, 10);
        let bg = level.add_new_layer(Some("bg"));
        let base = level.history().len();

        assert_eq!(level.paint_tiles((1, 1), Some((1, 1)), Some(&t1())), 1);
        assert_eq!(level.paint_tiles((4, 4), Some((1, 1)), Some(&t1())), 3);
        assert!(level.complete_tile_action());

        assert_eq!(level.history().len(), base + 1);
        match level.history().records().last() {
            Some(EditRecord::Stroke { layer, edits }) => {
                assert_eq!(*layer, bg);
                assert_eq!(edits.len(), 4);
            }
            other => panic!("Expected stroke, got {:?}", other),
        }

        let painted = vec![(1, 1), (2, 2), (3, 3), (4, 4)];
        assert_eq!(filled(&level, bg), painted);

        assert!(level.undo());
        assert!(filled(&level, bg).is_empty());

        assert!(level.redo());
        assert_eq!(filled(&level, bg), painted);
        for (x, y) in painted {
            assert_eq!(level.tile(bg, x, y), Some(&t1()));
        }
    }

    #[test]
    fn test_four_way_stroke_has_no_diagonal_gaps() {
        let mut level = Level::new(10, 10);
        level.set_stroke_connectivity(StrokeConnectivity::FourWay);
        let bg = level.add_new_layer(None);

        level.paint_tiles((1, 1), None, Some(&t1()));
        assert_eq!(level.paint_tiles((4, 4), Some((1, 1)), Some(&t1())), 6);
        level.complete_tile_action();

        assert_eq!(filled(&level, bg).len(), 7);
    }

    #[test]
    fn test_fast_drag_fills_intermediate_cells() {
        let mut level = Level::new(10, 10);
        let bg = level.add_new_layer(None);

        level.paint_tiles((0, 0), None, Some(&t1()));
        level.paint_tiles((3, 1), Some((0, 0)), Some(&t1()));
        level.complete_tile_action();

        let cells = filled(&level, bg);
        assert_eq!(cells.len(), 4);
        for x in 0..=3 {
            assert!(cells.iter().any(|c| c.0 == x), "column {} missing", x);
        }
    }

    #[test]
    fn test_painting_matching_tile_records_nothing() {
        let mut level = Level::new(5, 5);
        level.add_new_layer(None);
        level.paint_tiles((2, 2), None, Some(&t1()));
        level.complete_tile_action();
        let len = level.history().len();

        assert_eq!(level.paint_tiles((2, 2), None, Some(&t1())), 0);
        assert!(!level.complete_tile_action());
        assert_eq!(level.history().len(), len);

        // Erasing an empty cell is just as idle
        assert_eq!(level.paint_tiles((0, 0), None, None), 0);
        assert!(!level.complete_tile_action());
        assert_eq!(level.history().len(), len);
    }

    #[test]
    fn test_paint_without_layer_or_out_of_range() {
        let mut level = Level::new(5, 5);
        assert_eq!(level.paint_tiles((1, 1), None, Some(&t1())), 0);

        let bg = level.add_new_layer(None);
        assert_eq!(level.paint_tiles((5, 0), None, Some(&t1())), 0);
        assert_eq!(level.paint_tiles((-1, 2), None, Some(&t1())), 0);
        assert!(!level.complete_tile_action());

        // A line that starts outside only paints the cells inside
        assert_eq!(level.paint_tiles((1, 0), Some((-3, 0)), Some(&t1())), 2);
        assert_eq!(filled(&level, bg), vec![(0, 0), (1, 0)]);

        level.set_current_layer(None).unwrap();
        assert_eq!(level.paint_tiles((3, 3), None, Some(&t1())), 0);
    }

    #[test]
    fn test_erase_shares_the_paint_path() {
        let mut level = Level::new(5, 5);
        let bg = level.add_new_layer(None);
        level.paint_tiles((0, 2), None, Some(&t1()));
        level.paint_tiles((4, 2), Some((0, 2)), Some(&t1()));
        level.complete_tile_action();

        assert_eq!(level.paint_tiles((3, 2), Some((1, 2)), None), 3);
        level.complete_tile_action();
        assert_eq!(filled(&level, bg), vec![(0, 2), (4, 2)]);

        level.undo();
        assert_eq!(filled(&level, bg).len(), 5);
    }

    #[test]
    fn test_repaint_over_other_tile_is_reverted() {
        let mut level = Level::new(3, 3);
        let bg = level.add_new_layer(None);
        level.paint_tiles((1, 1), None, Some(&t1()));
        level.complete_tile_action();
        level.paint_tiles((1, 1), None, Some(&t2()));
        level.complete_tile_action();

        assert_eq!(level.tile(bg, 1, 1), Some(&t2()));
        level.undo();
        assert_eq!(level.tile(bg, 1, 1), Some(&t1()));
        level.redo();
        assert_eq!(level.tile(bg, 1, 1), Some(&t2()));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        level.paint_tiles((0, 0), None, Some(&t1()));
        level.complete_tile_action();
        let b = level.add_new_layer(Some("b"));
        level.rename_layer(a, "ground");
        level.resize(6, 5, ResizeAnchor::Center, true);

        let snapshot = level.to_data();
        assert!(level.undo());
        assert!(level.redo());
        assert_eq!(level.to_data(), snapshot);

        while level.undo() {}
        assert_eq!(level.layer_count(), 0);
        assert_eq!((level.width(), level.height()), (4, 4));

        while level.redo() {}
        assert_eq!(level.to_data(), snapshot);
        assert_eq!(level.layer_ids(), &[a, b]);
    }

    #[test]
    fn test_record_after_undo_discards_redo_branch() {
        let mut level = Level::new(4, 4);
        let bg = level.add_new_layer(None);
        level.paint_tiles((0, 0), None, Some(&t1()));
        level.complete_tile_action();
        level.paint_tiles((1, 1), None, Some(&t1()));
        level.complete_tile_action();

        level.undo();
        level.undo();
        level.paint_tiles((3, 3), None, Some(&t2()));
        level.complete_tile_action();

        assert_eq!(level.history().len(), 2);
        assert!(!level.redo());
        assert_eq!(filled(&level, bg), vec![(3, 3)]);
    }

    #[test]
    fn test_undo_commits_open_stroke() {
        let mut level = Level::new(4, 4);
        let bg = level.add_new_layer(None);
        level.paint_tiles((2, 2), None, Some(&t1()));
        assert_eq!(level.pending_edit_count(), 1);
        assert!(level.can_undo());

        assert!(level.undo());
        assert_eq!(level.pending_edit_count(), 0);
        assert_eq!(level.tile(bg, 2, 2), None);
        assert!(level.redo());
        assert_eq!(level.tile(bg, 2, 2), Some(&t1()));
    }

    #[test]
    fn test_switching_layer_mid_stroke_splits_it() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        let b = level.add_new_layer(Some("b"));
        let base = level.history().len();

        level.paint_tiles((0, 0), None, Some(&t1()));
        level.set_current_layer(Some(b)).unwrap();
        level.paint_tiles((1, 0), None, Some(&t1()));
        level.complete_tile_action();

        assert_eq!(level.history().len(), base + 2);
        assert_eq!(level.tile(a, 0, 0), Some(&t1()));
        assert_eq!(level.tile(b, 1, 0), Some(&t1()));
        level.undo();
        assert_eq!(level.tile(b, 1, 0), None);
        assert_eq!(level.tile(a, 0, 0), Some(&t1()));
    }

    #[test]
    fn test_add_layer_selection() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        assert_eq!(level.current_layer(), Some(a));

        let b = level.add_new_layer(Some("b"));
        assert_eq!(level.current_layer(), Some(a));
        assert_eq!(level.layer_ids(), &[a, b]);

        level.set_current_layer(None).unwrap();
        let c = level.add_new_layer(Some("c"));
        assert_eq!(level.current_layer(), Some(c));
    }

    #[test]
    fn test_add_layer_rejects_duplicates_and_wrong_size() {
        let mut level = Level::new(4, 4);
        let layer = Layer::new("dup", 4, 4);
        let copy = layer.clone();
        assert_eq!(level.add_layer(layer), Ok(true));
        let len = level.history().len();
        assert_eq!(level.add_layer(copy), Ok(false));
        assert_eq!(level.history().len(), len);
        assert_eq!(level.layer_count(), 1);

        assert!(matches!(
            level.add_layer(Layer::new("big", 5, 4)),
            Err(EditError::MalformedLayer { .. })
        ));
        assert_eq!(level.layer_count(), 1);
    }

    #[test]
    fn test_default_layer_names() {
        let mut level = Level::new(2, 2);
        let a = level.add_new_layer(None);
        let b = level.add_new_layer(Some("   "));
        assert_eq!(level.layer(a).unwrap().name(), "layer 1");
        assert_eq!(level.layer(b).unwrap().name(), "layer 2");
    }

    #[test]
    fn test_delete_current_layer_clears_selection() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        let b = level.add_new_layer(Some("b"));

        assert!(level.delete_layer(a));
        assert_eq!(level.current_layer(), None);
        assert_eq!(level.layer_ids(), &[b]);
        assert!(level.layer(a).is_none());

        assert!(!level.delete_layer(a));
    }

    #[test]
    fn test_undo_delete_restores_layer_with_contents() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        level.paint_tiles((3, 3), None, Some(&t2()));
        level.complete_tile_action();

        level.delete_layer(a);
        assert_eq!(level.layer_count(), 0);

        level.undo();
        assert_eq!(level.layer_ids(), &[a]);
        assert_eq!(level.tile(a, 3, 3), Some(&t2()));
        // Selection is not history
        assert_eq!(level.current_layer(), None);
        level.set_current_layer(Some(a)).unwrap();

        level.redo();
        assert_eq!(level.layer_count(), 0);
        assert_eq!(level.current_layer(), None);
    }

    #[test]
    fn test_truncation_releases_unreachable_layers() {
        let mut level = Level::new(4, 4);
        level.add_new_layer(Some("keep"));
        let temp = level.add_new_layer(Some("temp"));
        level.delete_layer(temp);
        assert_eq!(level.stored_layer_count(), 2);

        level.undo();
        level.undo();
        assert_eq!(level.layer_count(), 1);
        level.add_new_layer(Some("other"));

        assert_eq!(level.stored_layer_count(), 2);
        assert!(level.layers().all(|l| l.id() != temp));
    }

    #[test]
    fn test_shift_layer() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        let b = level.add_new_layer(Some("b"));
        let c = level.add_new_layer(Some("c"));
        let len = level.history().len();

        assert!(!level.shift_layer(c, true));
        assert!(!level.shift_layer(a, false));
        assert!(!level.shift_layer(LayerId::new(), true));
        assert_eq!(level.history().len(), len);

        assert!(level.shift_layer(a, true));
        assert_eq!(level.layer_ids(), &[b, a, c]);
        assert!(level.shift_layer(c, false));
        assert_eq!(level.layer_ids(), &[b, c, a]);

        level.undo();
        assert_eq!(level.layer_ids(), &[b, a, c]);
        level.undo();
        assert_eq!(level.layer_ids(), &[a, b, c]);
    }

    #[test]
    fn test_rename_layer() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        let len = level.history().len();

        assert!(!level.rename_layer(a, "a"));
        assert!(!level.rename_layer(LayerId::new(), "x"));
        assert_eq!(level.history().len(), len);

        assert!(level.rename_layer(a, "ground"));
        assert_eq!(level.layer(a).unwrap().name(), "ground");
        level.undo();
        assert_eq!(level.layer(a).unwrap().name(), "a");
        level.redo();
        assert_eq!(level.layer(a).unwrap().name(), "ground");
    }

    #[test]
    fn test_set_current_layer_rejects_foreign_layer() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(None);
        let foreign = Layer::new("elsewhere", 4, 4).id();
        let revision = level.revision();
        let len = level.history().len();

        assert_eq!(
            level.set_current_layer(Some(foreign)),
            Err(EditError::UnknownLayer(foreign))
        );
        assert_eq!(level.current_layer(), Some(a));
        assert_eq!(level.revision(), revision);
        assert_eq!(level.history().len(), len);

        level.set_current_layer(None).unwrap();
        assert_eq!(level.history().len(), len);
    }

    #[test]
    fn test_resize_all_layers() {
        let mut level = Level::new(5, 5);
        let a = level.add_new_layer(Some("a"));
        let b = level.add_new_layer(Some("b"));
        level.paint_tiles((0, 0), None, Some(&t1()));
        level.complete_tile_action();

        assert!(level.resize(10, 5, ResizeAnchor::Up, true));
        assert_eq!((level.width(), level.height()), (10, 5));
        for layer in level.layers() {
            assert_eq!((layer.width(), layer.height()), (10, 5));
        }
        assert_eq!(level.tile(a, 2, 0), Some(&t1()));
        assert!(level.layer(b).unwrap().is_empty());

        level.undo();
        assert_eq!((level.width(), level.height()), (5, 5));
        assert_eq!(level.tile(a, 0, 0), Some(&t1()));
        level.redo();
        assert_eq!(level.tile(a, 2, 0), Some(&t1()));
    }

    #[test]
    fn test_resize_noop_and_unrecorded() {
        let mut level = Level::new(5, 5);
        level.add_new_layer(None);
        let len = level.history().len();

        assert!(!level.resize(5, 5, ResizeAnchor::Center, true));
        assert!(!level.resize(0, 5, ResizeAnchor::Center, true));
        assert!(!level.resize(u32::MAX, u32::MAX, ResizeAnchor::Center, true));
        assert_eq!((level.width(), level.height()), (5, 5));

        assert!(level.resize(7, 3, ResizeAnchor::Center, false));
        assert_eq!(level.history().len(), len);
    }

    #[test]
    fn test_deleted_layer_follows_level_size() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        level.paint_tiles((3, 3), None, Some(&t1()));
        level.delete_layer(a);
        level.resize(2, 2, ResizeAnchor::TopLeft, true);

        level.undo();
        level.undo();
        assert_eq!((level.width(), level.height()), (4, 4));
        assert_eq!(level.layer(a).map(|l| (l.width(), l.height())), Some((4, 4)));
        assert_eq!(level.tile(a, 3, 3), Some(&t1()));

        level.redo();
        level.redo();
        level.undo();
        level.undo();
        assert_eq!(level.tile(a, 3, 3), Some(&t1()));
    }

    #[test]
    fn test_unrecorded_resize_keeps_restored_layer_in_step() {
        let mut level = Level::new(4, 4);
        let a = level.add_new_layer(Some("a"));
        level.delete_layer(a);
        assert!(level.resize(8, 8, ResizeAnchor::TopLeft, false));

        assert!(level.undo());
        let layer = level.layer(a).unwrap();
        assert_eq!((layer.width(), layer.height()), (8, 8));
        assert!(Level::from_data(level.to_data()).is_ok());
    }

    #[test]
    fn test_undo_shrink_restores_cropped_cells() {
        let mut level = Level::new(10, 10);
        let bg = level.add_new_layer(Some("bg"));
        let top = level.add_new_layer(Some("top"));
        level.paint_tiles((9, 9), None, Some(&t1()));
        level.paint_tiles((2, 2), None, Some(&t1()));
        level.set_current_layer(Some(top)).unwrap();
        level.paint_tiles((0, 9), None, Some(&t2()));
        level.complete_tile_action();
        let before = level.to_data();

        assert!(level.resize(5, 5, ResizeAnchor::TopLeft, true));
        assert_eq!(filled(&level, bg), vec![(2, 2)]);
        assert!(level.layer(top).unwrap().is_empty());

        assert!(level.undo());
        assert_eq!(level.to_data(), before);
        assert_eq!(level.tile(bg, 9, 9), Some(&t1()));
        assert_eq!(level.tile(top, 0, 9), Some(&t2()));

        assert!(level.redo());
        assert_eq!((level.width(), level.height()), (5, 5));
        assert_eq!(filled(&level, bg), vec![(2, 2)]);
        assert!(level.undo());
        assert_eq!(level.to_data(), before);
    }

    #[test]
    fn test_far_previous_sample_is_clipped() {
        let mut level = Level::new(5, 5);
        let bg = level.add_new_layer(None);

        assert_eq!(level.paint_tiles((0, 0), Some((i32::MIN, 0)), Some(&t1())), 1);
        assert_eq!(
            level.paint_tiles((4, 4), Some((-1_000_000_000, -1_000_000_000)), Some(&t1())),
            4
        );
        assert_eq!(level.paint_tiles((4, 0), Some((i32::MAX, 0)), Some(&t2())), 1);
        assert_eq!(level.paint_tiles((2, 4), Some((2, i32::MAX)), None), 0);
        level.complete_tile_action();

        let mut expected = vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (4, 0)];
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(filled(&level, bg), expected);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut level = Level::new(3, 3);
        let r0 = level.revision();
        level.add_new_layer(None);
        let r1 = level.revision();
        assert!(r1 > r0);

        level.paint_tiles((1, 1), None, Some(&t1()));
        let r2 = level.revision();
        assert!(r2 > r1);

        level.paint_tiles((1, 1), None, Some(&t1()));
        assert_eq!(level.revision(), r2);

        assert!(level.complete_tile_action());
        let r3 = level.revision();
        assert!(r3 > r2);
        assert!(!level.complete_tile_action());
        assert_eq!(level.revision(), r3);

        level.undo();
        assert!(level.revision() > r3);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut level = Level::named("Cave", 3, 2);
        let a = level.add_new_layer(Some("back"));
        level.add_new_layer(Some("front"));
        level.set_current_layer(Some(a)).unwrap();
        level.paint_tiles((2, 1), None, Some(&t1().with_collidable(true)));
        level.complete_tile_action();

        let data = level.to_data();
        assert_eq!(data.name, "Cave");
        assert_eq!(data.layers.len(), 2);
        assert_eq!(data.layers[0].tiles.len(), 6);

        let json = serde_json::to_string(&data).unwrap();
        let restored = Level::from_data(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(restored.to_data(), data);
        assert!(restored.history().is_empty());
        assert_eq!(restored.current_layer(), restored.layer_ids().first().copied());
    }

    #[test]
    fn test_from_data_validates() {
        let data = LevelData {
            name: "bad".to_string(),
            width: 2,
            height: 2,
            layers: vec![LayerData {
                name: "short".to_string(),
                tiles: vec![None; 3],
            }],
        };
        assert_eq!(
            Level::from_data(data).unwrap_err(),
            EditError::MalformedLayer {
                name: "short".to_string(),
                expected: 4,
                actual: 3
            }
        );

        let empty = LevelData {
            name: "empty".to_string(),
            width: 0,
            height: 2,
            layers: vec![],
        };
        assert!(matches!(
            Level::from_data(empty),
            Err(EditError::InvalidDimensions { .. })
        ));

        let huge = LevelData {
            name: "huge".to_string(),
            width: 65536,
            height: 65536,
            layers: vec![],
        };
        assert_eq!(
            Level::from_data(huge).unwrap_err(),
            EditError::InvalidDimensions {
                width: 65536,
                height: 65536
            }
        );
    }
}
