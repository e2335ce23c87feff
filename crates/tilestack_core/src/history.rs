//! Undo/redo history
//!
//! The log is linear: recording while some actions are undone throws the
//! undone branch away. Records hold layer handles rather than layers, and are
//! replayed against the level contents passed in by the owning [`Level`].
//!
//! [`Level`]: crate::Level

use crate::level::LevelContent;
use crate::{LayerId, ResizeAnchor, TileRef};

/// One cell's value before and after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub x: u32,
    pub y: u32,
    pub old_tile: Option<TileRef>,
    pub new_tile: Option<TileRef>,
}

/// A reversible change to a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRecord {
    /// Every cell changed by one paint or erase drag
    Stroke { layer: LayerId, edits: Vec<CellEdit> },
    /// The layer sequence before and after an add, delete or reorder
    LayerSet {
        before: Vec<LayerId>,
        after: Vec<LayerId>,
    },
    Rename {
        layer: LayerId,
        old_name: String,
        new_name: String,
    },
    Resize {
        old_width: u32,
        old_height: u32,
        new_width: u32,
        new_height: u32,
        anchor: ResizeAnchor,
        /// Painted cells the resize cut off, per layer, in old-grid
        /// coordinates. Written back after the grid is restored.
        cropped: Vec<(LayerId, Vec<CellEdit>)>,
    },
}

impl EditRecord {
    /// Short description for logs and menu labels
    pub fn label(&self) -> &'static str {
        match self {
            EditRecord::Stroke { .. } => "Paint Tiles",
            EditRecord::LayerSet { .. } => "Layers",
            EditRecord::Rename { .. } => "Rename Layer",
            EditRecord::Resize { .. } => "Resize Level",
        }
    }

    /// Redo this change
    pub(crate) fn apply(&self, level: &mut LevelContent) {
        match self {
            EditRecord::Stroke { layer, edits } => {
                set_cells(level, *layer, edits.iter().map(|e| (e.x, e.y, &e.new_tile)))
            }
            EditRecord::LayerSet { after, .. } => level.set_order(after.clone()),
            EditRecord::Rename {
                layer, new_name, ..
            } => level.rename(*layer, new_name),
            EditRecord::Resize {
                new_width,
                new_height,
                anchor,
                ..
            } => level.resize(*new_width, *new_height, *anchor),
        }
    }

    /// Undo this change
    pub(crate) fn revert(&self, level: &mut LevelContent) {
        match self {
            EditRecord::Stroke { layer, edits } => set_cells(
                level,
                *layer,
                edits.iter().rev().map(|e| (e.x, e.y, &e.old_tile)),
            ),
            EditRecord::LayerSet { before, .. } => level.set_order(before.clone()),
            EditRecord::Rename {
                layer, old_name, ..
            } => level.rename(*layer, old_name),
            EditRecord::Resize {
                old_width,
                old_height,
                anchor,
                cropped,
                ..
            } => {
                level.resize(*old_width, *old_height, *anchor);
                for (layer, edits) in cropped {
                    set_cells(level, *layer, edits.iter().map(|e| (e.x, e.y, &e.old_tile)));
                }
            }
        }
    }

    /// Layer handles this record can bring back or touch
    pub fn referenced_layers(&self) -> Vec<LayerId> {
        match self {
            EditRecord::Stroke { layer, .. } | EditRecord::Rename { layer, .. } => vec![*layer],
            EditRecord::LayerSet { before, after } => {
                before.iter().chain(after.iter()).copied().collect()
            }
            EditRecord::Resize { cropped, .. } => cropped.iter().map(|(id, _)| *id).collect(),
        }
    }
}

fn set_cells<'a>(
    level: &mut LevelContent,
    layer_id: LayerId,
    cells: impl Iterator<Item = (u32, u32, &'a Option<TileRef>)>,
) {
    let Some(layer) = level.layer_mut(layer_id) else {
        tracing::warn!("History refers to layer {} which no longer exists", layer_id);
        return;
    };
    for (x, y, tile) in cells {
        if let Err(e) = layer.set_tile(x, y, tile.clone()) {
            tracing::warn!("Skipping history cell: {}", e);
        }
    }
}

/// Linear undo/redo log with a cursor
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<EditRecord>,
    /// Number of records currently applied; the cursor is `applied - 1`
    applied: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record that has already been applied. Any undone records are
    /// discarded first and returned.
    pub fn record(&mut self, record: EditRecord) -> Vec<EditRecord> {
        let discarded = self.records.split_off(self.applied);
        self.records.push(record);
        self.applied = self.records.len();
        discarded
    }

    /// Move the cursor back and return the record to revert
    pub(crate) fn step_back(&mut self) -> Option<&EditRecord> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.records.get(self.applied)
    }

    /// Move the cursor forward and return the record to apply
    pub(crate) fn step_forward(&mut self) -> Option<&EditRecord> {
        if self.applied >= self.records.len() {
            return None;
        }
        self.applied += 1;
        self.records.get(self.applied - 1)
    }

    /// Index of the last applied record, None if nothing is applied
    pub fn cursor(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.records.len()
    }

    /// Label of the record `undo` would revert
    pub fn undo_label(&self) -> Option<&'static str> {
        self.cursor().map(|i| self.records[i].label())
    }

    /// Label of the record `redo` would apply
    pub fn redo_label(&self) -> Option<&'static str> {
        self.records.get(self.applied).map(EditRecord::label)
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.applied = 0;
    }

    /// Whether any retained record refers to the layer
    pub fn references(&self, layer: LayerId) -> bool {
        self.records
            .iter()
            .any(|r| r.referenced_layers().contains(&layer))
    }
}
