//! Route waypoints and their on-disk record.
//!
//! On disk every waypoint is one flat record:
//!
//! | field       | present for                        |
//! |-------------|------------------------------------|
//! | `type`      | always (`move`, `step`, `use_item`, `right_click`) |
//! | `x`,`y`,`z` | always                             |
//! | `direction` | `step`, `use_item`, `right_click`  |
//! | `item`      | `use_item`                         |
//!
//! [`Waypoint`] (de)serialises through [`WaypointRecord`], so a route file is
//! simply a JSON array of waypoints.

use serde::{Deserialize, Serialize};

use crate::PilotError;
use crate::tile::{Direction, Tile};

/// A single route instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WaypointRecord", into = "WaypointRecord")]
pub enum Waypoint {
    /// Walk to `tile`.
    Move { tile: Tile },
    /// Walk to `tile`, then step once in `direction` (ramps, stairs, holes).
    Step { tile: Tile, direction: Direction },
    /// Walk to `tile`, then use `item` on the neighbour in `direction`
    /// (rope spots, shovel holes).
    UseItem {
        item: String,
        tile: Tile,
        direction: Direction,
    },
    /// Walk to `tile`, then right-click the neighbour in `direction`
    /// (ladders, sewer grates).
    RightClick { tile: Tile, direction: Direction },
}

impl Waypoint {
    /// The tile the player has to stand on for this waypoint.
    pub fn tile(&self) -> Tile {
        match self {
            Waypoint::Move { tile }
            | Waypoint::Step { tile, .. }
            | Waypoint::UseItem { tile, .. }
            | Waypoint::RightClick { tile, .. } => *tile,
        }
    }

    pub fn kind(&self) -> WaypointKind {
        match self {
            Waypoint::Move { .. } => WaypointKind::Move,
            Waypoint::Step { .. } => WaypointKind::Step,
            Waypoint::UseItem { .. } => WaypointKind::UseItem,
            Waypoint::RightClick { .. } => WaypointKind::RightClick,
        }
    }
}

/// Discriminant of a [`Waypoint`], the record's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Move,
    Step,
    UseItem,
    RightClick,
}

/// Flat wire form of a [`Waypoint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointRecord {
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

impl From<Waypoint> for WaypointRecord {
    fn from(wp: Waypoint) -> Self {
        let tile = wp.tile();
        let kind = wp.kind();
        let (direction, item) = match wp {
            Waypoint::Move { .. } => (None, None),
            Waypoint::Step { direction, .. } | Waypoint::RightClick { direction, .. } => {
                (Some(direction), None)
            }
            Waypoint::UseItem {
                item, direction, ..
            } => (Some(direction), Some(item)),
        };
        Self {
            kind,
            x: tile.x,
            y: tile.y,
            z: tile.z,
            direction,
            item,
        }
    }
}

impl TryFrom<WaypointRecord> for Waypoint {
    type Error = PilotError;

    fn try_from(rec: WaypointRecord) -> Result<Self, Self::Error> {
        let tile = Tile::new(rec.x, rec.y, rec.z);
        let direction = || {
            rec.direction.ok_or_else(|| {
                PilotError::InvalidWaypoint(format!("{:?} at {tile} needs a direction", rec.kind))
            })
        };
        Ok(match rec.kind {
            WaypointKind::Move => Waypoint::Move { tile },
            WaypointKind::Step => Waypoint::Step {
                tile,
                direction: direction()?,
            },
            WaypointKind::RightClick => Waypoint::RightClick {
                tile,
                direction: direction()?,
            },
            WaypointKind::UseItem => {
                let direction = direction()?;
                let item = rec
                    .item
                    .clone()
                    .filter(|i| !i.trim().is_empty())
                    .ok_or_else(|| {
                        PilotError::InvalidWaypoint(format!("use_item at {tile} needs an item"))
                    })?;
                Waypoint::UseItem {
                    item,
                    tile,
                    direction,
                }
            }
        })
    }
}
