//! Resize anchors
//!
//! An anchor picks, per axis, which part of the old grid is kept in place
//! when a level grows or shrinks: the low edge (left/top), the high edge
//! (right/bottom) or the center.

use serde::{Deserialize, Serialize};

/// Where the surviving content is pinned on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisPin {
    Low,
    Center,
    High,
}

/// Index mapping between an old and a new axis length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlacement {
    /// First old index that survives
    pub old_start: u32,
    /// Where that index lands in the new grid
    pub new_start: u32,
    /// Number of indices copied, `min(old, new)`
    pub overlap: u32,
}

impl AxisPin {
    /// Compute the copy window for an axis going from `old_len` to `new_len`.
    ///
    /// Centered placement uses `(max - min) / 2` with integer division, so an
    /// odd difference leaves the extra row/column on the high side.
    pub fn placement(self, old_len: u32, new_len: u32) -> AxisPlacement {
        let overlap = old_len.min(new_len);
        let extra = old_len.max(new_len) - overlap;

        let (old_start, new_start) = match self {
            AxisPin::Low => (0, 0),
            AxisPin::High => (old_len - overlap, new_len - overlap),
            AxisPin::Center => {
                let offset = extra / 2;
                if new_len > old_len {
                    (0, offset)
                } else {
                    (offset, 0)
                }
            }
        };

        AxisPlacement {
            old_start,
            new_start,
            overlap,
        }
    }
}

/// One of the 9 compass anchors, numbered 0-8 in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResizeAnchor {
    TopLeft,
    Up,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Down,
    BottomRight,
}

impl ResizeAnchor {
    /// All anchors in code order
    pub const ALL: [ResizeAnchor; 9] = [
        ResizeAnchor::TopLeft,
        ResizeAnchor::Up,
        ResizeAnchor::TopRight,
        ResizeAnchor::Left,
        ResizeAnchor::Center,
        ResizeAnchor::Right,
        ResizeAnchor::BottomLeft,
        ResizeAnchor::Down,
        ResizeAnchor::BottomRight,
    ];

    /// Look up an anchor by its grid code (0 = top-left ... 8 = bottom-right)
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// The anchor's grid code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The (x, y) pin pair selected by this anchor
    pub fn pins(self) -> (AxisPin, AxisPin) {
        let pin = |i: u8| match i {
            0 => AxisPin::Low,
            1 => AxisPin::Center,
            _ => AxisPin::High,
        };
        let code = self.code();
        (pin(code % 3), pin(code / 3))
    }

    /// Display name for UI labels
    pub fn display_name(self) -> &'static str {
        match self {
            ResizeAnchor::TopLeft => "Top Left",
            ResizeAnchor::Up => "Up",
            ResizeAnchor::TopRight => "Top Right",
            ResizeAnchor::Left => "Left",
            ResizeAnchor::Center => "Center",
            ResizeAnchor::Right => "Right",
            ResizeAnchor::BottomLeft => "Bottom Left",
            ResizeAnchor::Down => "Down",
            ResizeAnchor::BottomRight => "Bottom Right",
        }
    }
}
