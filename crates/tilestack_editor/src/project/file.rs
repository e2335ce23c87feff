//! Project file save/load operations

use super::EditorDocument;
use std::path::Path;
use tilestack_core::{Project, ProjectData};

#[derive(Debug)]
pub enum DocumentError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    /// The file parsed but describes an impossible level
    InvalidData(String),
    NoPath,
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::IoError(e) => write!(f, "IO error: {}", e),
            DocumentError::ParseError(e) => write!(f, "Parse error: {}", e),
            DocumentError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            DocumentError::InvalidData(e) => write!(f, "Invalid project: {}", e),
            DocumentError::NoPath => write!(f, "No file path set"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl EditorDocument {
    /// Load project from file. History starts empty.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DocumentError::IoError(e.to_string()))?;

        let data =
            ProjectData::from_json(&content).map_err(|e| DocumentError::ParseError(e.to_string()))?;

        let project =
            Project::from_data(data).map_err(|e| DocumentError::InvalidData(e.to_string()))?;

        Ok(Self {
            project,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    /// Save project to file
    pub fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let content = self
            .project
            .to_data()
            .to_json_pretty()
            .map_err(|e| DocumentError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| DocumentError::IoError(e.to_string()))?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;

        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), DocumentError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(DocumentError::NoPath)
        }
    }
}
