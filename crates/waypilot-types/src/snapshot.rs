//! The decoded per-tick world view.
//!
//! A [`WorldSnapshot`] is produced by the vision/memory collaborators once per
//! tick and replaced wholesale on the next one.  The scheduling core only
//! reads it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grid::FloorGrid;
use crate::tile::Tile;

/// Position readings below this confidence are treated as "no fix".
pub const MIN_POSITION_CONFIDENCE: f32 = 0.5;

/// Stable identifier of a visible creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

/// Stable identifier of a known corpse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorpseId(pub u64);

/// The player's decoded position together with the decoder's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerFix {
    pub tile: Tile,
    /// 0.0 (garbage) ..= 1.0 (certain).
    pub confidence: f32,
}

/// Health and mana, both as percentages of their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health_percent: u8,
    pub mana_percent: u8,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health_percent: 100,
            mana_percent: 100,
        }
    }
}

/// A visible creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub tile: Tile,
    pub health_percent: u8,
    /// True when the player currently has this creature selected as target.
    pub targeted: bool,
    /// Whitelisted creatures are never attacked.
    pub whitelisted: bool,
}

impl Creature {
    pub fn is_alive(&self) -> bool {
        self.health_percent > 0
    }
}

/// A corpse that may still hold loot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpse {
    pub id: CorpseId,
    pub tile: Tile,
}

/// Location of an inventory slot: container index and slot within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub container: u8,
    pub index: u8,
}

/// One decoded inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub slot: SlotRef,
    pub item: String,
    pub count: u32,
    /// True for a closed container item (e.g. a backpack) that can be opened.
    pub is_container: bool,
}

/// Screen geometry used only by real input backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenProfile {
    /// Edge length of one tile in pixels.
    pub tile_size: u32,
    /// Visible tile window (columns, rows); the player sits at its centre.
    pub visible_tiles: (u32, u32),
    /// Pixel position of the top-left corner of the game window.
    pub game_origin: (i32, i32),
}

impl Default for ScreenProfile {
    fn default() -> Self {
        Self {
            tile_size: 32,
            visible_tiles: (15, 11),
            game_origin: (0, 0),
        }
    }
}

/// Everything the core knows about the world for one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub player: Option<PlayerFix>,
    pub vitals: Vitals,
    pub creatures: Vec<Creature>,
    /// Known corpses, oldest first.
    pub corpses: Vec<Corpse>,
    pub inventory: Vec<InventorySlot>,
    /// Static walkability of the player's current floor.
    pub floor: Option<Arc<FloorGrid>>,
    pub profile: ScreenProfile,
}

impl WorldSnapshot {
    /// The player's tile when the position reading is trustworthy.
    pub fn player_tile(&self) -> Option<Tile> {
        self.player
            .filter(|fix| fix.confidence >= MIN_POSITION_CONFIDENCE)
            .map(|fix| fix.tile)
    }

    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn corpse(&self, id: CorpseId) -> Option<&Corpse> {
        self.corpses.iter().find(|c| c.id == id)
    }

    /// First inventory slot holding at least one `item`.
    pub fn find_item(&self, item: &str) -> Option<&InventorySlot> {
        self.inventory
            .iter()
            .find(|s| s.item == item && s.count > 0)
    }

    /// Total count of `item` across all decoded slots.
    pub fn item_count(&self, item: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|s| s.item == item)
            .map(|s| s.count)
            .sum()
    }

    /// The floor grid, provided it matches the floor the player stands on.
    pub fn floor_for(&self, z: i32) -> Option<&FloorGrid> {
        self.floor.as_deref().filter(|f| f.z() == z)
    }
}
