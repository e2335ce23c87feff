//! Project management for the editor
//!
//! This module handles project file save/load and the EditorDocument resource.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use std::path::PathBuf;
use tilestack_core::{Level, Project};

use crate::preferences::EditorPreferences;

/// The open project and where it lives on disk
#[derive(Debug, Clone, Default, Resource)]
pub struct EditorDocument {
    pub project: Project,
    pub path: Option<PathBuf>,
    pub dirty: bool,
}

impl EditorDocument {
    /// Start a new unsaved project sized and configured from preferences
    pub fn from_preferences(preferences: &EditorPreferences) -> Self {
        let (width, height) = preferences.default_level_size();
        let mut project = Project::with_level(Level::named("Level 1", width, height));
        project.set_resize_anchor(preferences.default_resize_anchor);
        project.set_stroke_connectivity(preferences.stroke_connectivity);
        Self {
            project,
            path: None,
            dirty: false,
        }
    }

    pub fn current_level(&self) -> &Level {
        self.project.current_level()
    }

    pub fn current_level_mut(&mut self) -> &mut Level {
        self.project.current_level_mut()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Display name: the file stem, or "Untitled"
    pub fn name(&self) -> &str {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
    }
}
