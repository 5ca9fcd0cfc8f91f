//! `waypilot-types` – shared vocabulary for every Waypilot crate.
//!
//! # Modules
//!
//! - [`tile`] – [`Tile`] and [`Direction`]: discrete world coordinates.
//! - [`grid`] – [`FloorGrid`]: the immutable per-floor walkability matrix.
//! - [`snapshot`] – [`WorldSnapshot`]: the decoded per-tick world view.
//! - [`waypoint`] – [`Waypoint`] and its flat on-disk record.
//! - [`input`] – [`InputAction`]: the abstract actions the core emits.

pub mod grid;
pub mod input;
pub mod snapshot;
pub mod tile;
pub mod waypoint;

pub use grid::FloorGrid;
pub use input::{InputAction, MouseButton};
pub use snapshot::{
    Corpse, CorpseId, Creature, CreatureId, InventorySlot, PlayerFix, ScreenProfile, SlotRef,
    Vitals, WorldSnapshot, MIN_POSITION_CONFIDENCE,
};
pub use tile::{Direction, Tile};
pub use waypoint::{Waypoint, WaypointKind, WaypointRecord};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global error type spanning input dispatch, path storage, and config faults.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PilotError {
    #[error("Input dispatch failed for {action}: {details}")]
    Input { action: String, details: String },

    #[error("Path store error: {0}")]
    PathStore(String),

    #[error("Invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error("Invalid floor grid: {0}")]
    InvalidGrid(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilot_error_display() {
        let err = PilotError::Input {
            action: "step north".to_string(),
            details: "window not focused".to_string(),
        };
        assert!(err.to_string().contains("step north"));
        assert!(err.to_string().contains("window not focused"));

        let err2 = PilotError::InvalidWaypoint("missing direction".to_string());
        assert!(err2.to_string().starts_with("Invalid waypoint"));
    }

    #[test]
    fn pilot_error_roundtrip() {
        let err = PilotError::PathStore("disk full".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: PilotError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
