//! Editor preferences
//!
//! Settings that persist between sessions: defaults for new levels, the
//! stroke rasterization mode and the recent project list.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tilestack_core::{
    cell_count, ResizeAnchor, StrokeConnectivity, DEFAULT_LEVEL_HEIGHT, DEFAULT_LEVEL_WIDTH,
};

/// Maximum number of entries kept in the recent projects list
pub const MAX_RECENT_PROJECTS: usize = 10;

/// A project opened in an earlier session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    pub default_level_width: u32,
    pub default_level_height: u32,
    pub default_resize_anchor: ResizeAnchor,
    pub stroke_connectivity: StrokeConnectivity,
    /// Most recent first
    pub recent_projects: Vec<RecentProject>,
    pub auto_open_last_project: bool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            default_level_width: DEFAULT_LEVEL_WIDTH,
            default_level_height: DEFAULT_LEVEL_HEIGHT,
            default_resize_anchor: ResizeAnchor::default(),
            stroke_connectivity: StrokeConnectivity::default(),
            recent_projects: Vec::new(),
            auto_open_last_project: false,
        }
    }
}

impl EditorPreferences {
    /// Move a project to the front of the recent list
    pub fn add_recent_project(&mut self, path: impl Into<String>, name: impl Into<String>) {
        let path = path.into();
        self.recent_projects.retain(|p| p.path != path);
        self.recent_projects.insert(
            0,
            RecentProject {
                path,
                name: name.into(),
            },
        );
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    pub fn remove_recent_project(&mut self, path: &str) {
        self.recent_projects.retain(|p| p.path != path);
    }

    pub fn clear_recent_projects(&mut self) {
        self.recent_projects.clear();
    }

    pub fn last_project(&self) -> Option<&RecentProject> {
        self.recent_projects.first()
    }

    /// Size for newly created levels. Zero sides become 1; a grid too large
    /// for a level falls back to the built-in default.
    pub fn default_level_size(&self) -> (u32, u32) {
        let size = (
            self.default_level_width.max(1),
            self.default_level_height.max(1),
        );
        match cell_count(size.0, size.1) {
            Some(_) => size,
            None => (DEFAULT_LEVEL_WIDTH, DEFAULT_LEVEL_HEIGHT),
        }
    }
}
