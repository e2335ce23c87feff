//! Tile references painted into layer cells

use serde::{Deserialize, Serialize};

/// Identifier of the tileset a tile comes from
pub type TilesetId = String;

/// The appearance and gameplay type of a painted cell.
///
/// Cells only hold references: the sprite itself (and any scaled copies used
/// for drawing) belongs to the tileset collaborator and is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub tileset_id: TilesetId,
    pub sprite_index: u32,
    #[serde(default)]
    pub collidable: bool,
}

impl TileRef {
    /// Create a non-collidable reference to a sprite in a tileset
    pub fn new(tileset_id: impl Into<TilesetId>, sprite_index: u32) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            sprite_index,
            collidable: false,
        }
    }

    /// Same reference with the collidable flag set
    pub fn with_collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }
}

impl std::fmt::Display for TileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.tileset_id, self.sprite_index)?;
        if self.collidable {
            write!(f, " (solid)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_value() {
        let a = TileRef::new("grass", 3);
        let b = TileRef::new(String::from("grass"), 3);
        assert_eq!(a, b);
        assert_ne!(a, TileRef::new("grass", 4));
        assert_ne!(a, a.clone().with_collidable(true));
    }

    #[test]
    fn test_missing_collidable_defaults_to_false() {
        let tile: TileRef =
            serde_json::from_str(r#"{"tileset_id":"walls","sprite_index":7}"#).unwrap();
        assert_eq!(tile, TileRef::new("walls", 7));
    }
}
