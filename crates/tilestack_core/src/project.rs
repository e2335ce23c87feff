//! Project - the set of levels open in the editor
//!
//! The project is the caller side of the level engine: it owns the selected
//! resize anchor and validates resize requests before they reach a level.

use crate::{cell_count, EditError, Level, LevelData, ResizeAnchor, StrokeConnectivity};
use serde::{Deserialize, Serialize};

/// Size of the level a new project starts with
pub const DEFAULT_LEVEL_WIDTH: u32 = 30;
pub const DEFAULT_LEVEL_HEIGHT: u32 = 30;

/// All levels open in the editor plus the level being edited
#[derive(Debug, Clone)]
pub struct Project {
    levels: Vec<Level>,
    current: usize,
    resize_anchor: ResizeAnchor,
}

impl Default for Project {
    fn default() -> Self {
        Self::with_level(Level::named(
            "Level 1",
            DEFAULT_LEVEL_WIDTH,
            DEFAULT_LEVEL_HEIGHT,
        ))
    }
}

impl Project {
    /// Create a project holding a single level
    pub fn with_level(level: Level) -> Self {
        Self {
            levels: vec![level],
            current: 0,
            resize_anchor: ResizeAnchor::default(),
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Add a level and return its index. The current level is unchanged.
    pub fn add_level(&mut self, level: Level) -> usize {
        self.levels.push(level);
        self.levels.len() - 1
    }

    pub fn current_level_index(&self) -> usize {
        self.current
    }

    pub fn set_current_level(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.levels.len() {
            let err = EditError::UnknownLevel(index);
            tracing::error!("Cannot select level: {}", err);
            return Err(err);
        }
        self.current = index;
        Ok(())
    }

    pub fn current_level(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn current_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current]
    }

    pub fn resize_anchor(&self) -> ResizeAnchor {
        self.resize_anchor
    }

    pub fn set_resize_anchor(&mut self, anchor: ResizeAnchor) {
        self.resize_anchor = anchor;
    }

    /// Apply a stroke connectivity to every level
    pub fn set_stroke_connectivity(&mut self, connectivity: StrokeConnectivity) {
        for level in &mut self.levels {
            level.set_stroke_connectivity(connectivity);
        }
    }

    /// Resize the current level around the selected anchor as an undoable edit.
    ///
    /// Returns `Ok(false)` if the size did not change. Empty grids and grids
    /// above [`MAX_LEVEL_CELLS`] are rejected.
    ///
    /// [`MAX_LEVEL_CELLS`]: crate::MAX_LEVEL_CELLS
    pub fn resize_current_level(&mut self, width: u32, height: u32) -> Result<bool, EditError> {
        if cell_count(width, height).is_none() {
            let err = EditError::InvalidDimensions { width, height };
            tracing::error!("Cannot resize level: {}", err);
            return Err(err);
        }
        let anchor = self.resize_anchor;
        Ok(self.current_level_mut().resize(width, height, anchor, true))
    }

    /// Snapshot of the current level under a chosen name
    pub fn export_current_level(&self, name: impl Into<String>) -> LevelData {
        let mut data = self.current_level().to_data();
        data.name = name.into();
        data
    }

    pub fn to_data(&self) -> ProjectData {
        ProjectData {
            levels: self.levels.iter().map(Level::to_data).collect(),
            current_level: self.current,
            resize_anchor: self.resize_anchor,
        }
    }

    /// Rebuild a project from a snapshot. An empty snapshot yields the
    /// default project.
    pub fn from_data(data: ProjectData) -> Result<Self, EditError> {
        let levels = data
            .levels
            .into_iter()
            .map(Level::from_data)
            .collect::<Result<Vec<_>, _>>()?;
        if levels.is_empty() {
            return Ok(Self::default());
        }
        let current = if data.current_level < levels.len() {
            data.current_level
        } else {
            0
        };
        Ok(Self {
            levels,
            current,
            resize_anchor: data.resize_anchor,
        })
    }
}

/// Serializable project snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectData {
    pub levels: Vec<LevelData>,
    #[serde(default)]
    pub current_level: usize,
    #[serde(default)]
    pub resize_anchor: ResizeAnchor,
}

impl ProjectData {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
