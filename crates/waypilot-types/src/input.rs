//! Abstract input actions.
//!
//! The core never touches pixels or OS input APIs.  It emits
//! [`InputAction`]s and an input backend (see `waypilot-hal`) translates them
//! into key presses and mouse clicks.  Click targets are expressed as tile
//! offsets relative to the player.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::SlotRef;
use crate::tile::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// A single discrete input the core asks the backend to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum InputAction {
    /// Walk one tile.
    Step(Direction),
    /// Click the tile at `(dx, dy)` relative to the player.
    Click { dx: i32, dy: i32, button: MouseButton },
    /// Use `item` from the inventory on the tile at `(dx, dy)`.
    UseItemOn { item: String, dx: i32, dy: i32 },
    /// Use the item in `slot` on the player.
    UseSlot { slot: SlotRef },
    /// Open the container item in `slot`.
    OpenContainer { slot: SlotRef },
    /// Press a configured hotkey (spells, rings, …).
    Hotkey(String),
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputAction::Step(d) => write!(f, "step {d}"),
            InputAction::Click { dx, dy, button } => {
                write!(f, "{button:?} click at ({dx}, {dy})")
            }
            InputAction::UseItemOn { item, dx, dy } => {
                write!(f, "use {item} on ({dx}, {dy})")
            }
            InputAction::UseSlot { slot } => {
                write!(f, "use slot {}:{}", slot.container, slot.index)
            }
            InputAction::OpenContainer { slot } => {
                write!(f, "open container {}:{}", slot.container, slot.index)
            }
            InputAction::Hotkey(key) => write!(f, "hotkey {key}"),
        }
    }
}
