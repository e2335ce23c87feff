//! Tile layers
//!
//! A layer is one named drawing plane of a level: a `width x height` grid of
//! optional tile references stored row-major (`y * width + x`).

use crate::{CellEdit, EditError, ResizeAnchor, TileRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest grid a level may have, in cells
pub const MAX_LEVEL_CELLS: usize = 1 << 24;

/// Cell count of a `width x height` grid, or None when it is empty or larger
/// than [`MAX_LEVEL_CELLS`]
pub fn cell_count(width: u32, height: u32) -> Option<usize> {
    let cells = (width as usize).checked_mul(height as usize)?;
    (cells > 0 && cells <= MAX_LEVEL_CELLS).then_some(cells)
}

/// Stable handle to a layer.
///
/// History records refer to layers through this handle, never through a
/// position in the layer sequence, so they stay valid across reorders and
/// across a delete that is later undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(Uuid);

impl LayerId {
    /// Generate a fresh handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single tile layer
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    name: String,
    width: u32,
    height: u32,
    /// None means empty
    tiles: Vec<Option<TileRef>>,
}

impl Layer {
    /// Create an empty layer
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            id: LayerId::new(),
            name: name.into(),
            width,
            height,
            tiles: vec![None; size],
        }
    }

    /// Rebuild a layer from stored cells. The caller checks the cell count.
    pub(crate) fn from_tiles(
        name: String,
        width: u32,
        height: u32,
        tiles: Vec<Option<TileRef>>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), width as usize * height as usize);
        Self {
            id: LayerId::new(),
            name,
            width,
            height,
            tiles,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell storage
    pub fn tiles(&self) -> &[Option<TileRef>] {
        &self.tiles
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the tile at a cell, None if the cell is empty or outside the grid
    pub fn tile(&self, x: u32, y: u32) -> Option<&TileRef> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles[self.index(x, y)].as_ref()
    }

    /// Set a cell and return its previous value
    pub fn set_tile(
        &mut self,
        x: u32,
        y: u32,
        tile: Option<TileRef>,
    ) -> Result<Option<TileRef>, EditError> {
        if !self.in_bounds(x, y) {
            return Err(EditError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let index = self.index(x, y);
        Ok(std::mem::replace(&mut self.tiles[index], tile))
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(Option::is_none)
    }

    /// Number of painted cells
    pub fn filled_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Painted cells that resizing to `new_width x new_height` around
    /// `anchor` would drop, as edits that clear them
    pub fn cropped_cells(
        &self,
        new_width: u32,
        new_height: u32,
        anchor: ResizeAnchor,
    ) -> Vec<CellEdit> {
        let (x_pin, y_pin) = anchor.pins();
        let xs = x_pin.placement(self.width, new_width);
        let ys = y_pin.placement(self.height, new_height);
        let kept_x = xs.old_start..xs.old_start + xs.overlap;
        let kept_y = ys.old_start..ys.old_start + ys.overlap;

        let mut cropped = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if kept_x.contains(&x) && kept_y.contains(&y) {
                    continue;
                }
                if let Some(tile) = self.tile(x, y) {
                    cropped.push(CellEdit {
                        x,
                        y,
                        old_tile: Some(tile.clone()),
                        new_tile: None,
                    });
                }
            }
        }
        cropped
    }

    /// Replace the grid with a `new_width x new_height` one, keeping the part
    /// of the old content selected by `anchor`. Cells that fall outside the
    /// overlap are dropped and new cells start empty.
    pub fn resize(&mut self, new_width: u32, new_height: u32, anchor: ResizeAnchor) {
        let (x_pin, y_pin) = anchor.pins();
        let xs = x_pin.placement(self.width, new_width);
        let ys = y_pin.placement(self.height, new_height);

        let mut tiles = vec![None; new_width as usize * new_height as usize];
        for dy in 0..ys.overlap {
            let old_row = (ys.old_start + dy) as usize * self.width as usize;
            let new_row = (ys.new_start + dy) as usize * new_width as usize;
            for dx in 0..xs.overlap {
                let old_index = old_row + (xs.old_start + dx) as usize;
                let new_index = new_row + (xs.new_start + dx) as usize;
                tiles[new_index] = self.tiles[old_index].take();
            }
        }

        self.tiles = tiles;
        self.width = new_width;
        self.height = new_height;
    }
}
