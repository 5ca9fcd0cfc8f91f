//! `waypilot-perception` – spatial reasoning over decoded floors.
//!
//! Turns the static floor layout plus the creatures seen this tick into a
//! walkable grid and answers "how do I get there?".
//!
//! # Modules
//!
//! - [`walkability`] – [`WalkabilityView`][walkability::WalkabilityView]: a
//!   per-tick copy of a [`FloorGrid`][waypilot_types::FloorGrid] with
//!   currently occupied tiles marked blocked.
//! - [`pathfinder`] – [`Pathfinder`][pathfinder::Pathfinder]: A* over a
//!   4-connected grid with buffers that are reused across calls.

pub mod pathfinder;
pub mod walkability;

pub use pathfinder::{GridView, Pathfinder};
pub use walkability::WalkabilityView;
