//! Level edit engine for tilestack
//!
//! This crate holds the editing model behind the tilestack editor:
//! - `Level` - A sized stack of layers with undo/redo history
//! - `Layer` - A single named grid of optional tile references
//! - `TileRef` - What a painted cell shows
//! - `History` / `EditRecord` - Linear, truncating undo log
//! - `Project` - The set of open levels
//!
//! The engine is driven with grid coordinates. Converting pointer positions,
//! drawing and file dialogs belong to the UI layer, which watches
//! [`Level::revision`] to know when to repaint.

mod anchor;
mod error;
mod history;
mod layer;
mod level;
mod project;
mod stroke;
mod tile;

pub use anchor::{AxisPin, AxisPlacement, ResizeAnchor};
pub use error::EditError;
pub use history::{CellEdit, EditRecord, History};
pub use layer::{cell_count, Layer, LayerId, MAX_LEVEL_CELLS};
pub use level::{LayerData, Level, LevelData};
pub use project::{Project, ProjectData, DEFAULT_LEVEL_HEIGHT, DEFAULT_LEVEL_WIDTH};
pub use stroke::{clip_start, line_cells, StrokeConnectivity};
pub use tile::{TileRef, TilesetId};
