//! Errors reported by the edit engine

use crate::LayerId;

/// A rejected edit request. The level is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The layer handle does not belong to the level's layer sequence
    UnknownLayer(LayerId),
    /// A cell access outside the grid
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A level size with a zero dimension
    InvalidDimensions { width: u32, height: u32 },
    /// A snapshot layer whose grid does not match the level size
    MalformedLayer {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// No level at the given project index
    UnknownLevel(usize),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::UnknownLayer(id) => write!(f, "Layer {} does not exist", id),
            EditError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Cell ({}, {}) is outside the {}x{} grid",
                x, y, width, height
            ),
            EditError::InvalidDimensions { width, height } => write!(
                f,
                "Level size must be greater than 0, got {}x{}",
                width, height
            ),
            EditError::MalformedLayer {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Layer '{}' has {} cells, expected {}",
                name, actual, expected
            ),
            EditError::UnknownLevel(index) => write!(f, "No level at index {}", index),
        }
    }
}

impl std::error::Error for EditError {}
