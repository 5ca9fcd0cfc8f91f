//! Cyclic waypoint cursor.
//!
//! A [`PathRepository`] is an immutable `Vec<Waypoint>` plus an index.
//! [`advance`][Route::advance] and [`go_back`][Route::go_back] wrap around
//! at both ends, so a hunting route loops forever.
//!
//! # Example
//!
//! ```rust
//! use waypilot_memory::{PathRepository, Route};
//! use waypilot_types::{Tile, Waypoint};
//!
//! let mut route = PathRepository::new(vec![
//!     Waypoint::Move { tile: Tile::new(1, 1, 7) },
//!     Waypoint::Move { tile: Tile::new(5, 1, 7) },
//! ]);
//! route.advance();
//! route.advance();
//! assert_eq!(route.position(), 0);
//! route.go_back();
//! assert_eq!(route.position(), 1);
//! ```

use waypilot_types::Waypoint;

/// What the scheduling core needs from a route.
pub trait Route {
    /// The waypoint under the cursor, or `None` for an empty route.
    fn current(&self) -> Option<&Waypoint>;
    /// Move the cursor forward, wrapping to the first waypoint.
    fn advance(&mut self);
    /// Move the cursor backward, wrapping to the last waypoint.
    fn go_back(&mut self);
    /// Put the cursor back on the first waypoint.
    fn reset(&mut self);
}

/// In-memory route with a wrapping cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathRepository {
    waypoints: Vec<Waypoint>,
    index: usize,
}

impl PathRepository {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            index: 0,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl Route for PathRepository {
    fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index)
    }

    fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = (self.index + 1) % self.waypoints.len();
        }
    }

    fn go_back(&mut self) {
        if !self.waypoints.is_empty() {
            self.index = self
                .index
                .checked_sub(1)
                .unwrap_or(self.waypoints.len() - 1);
        }
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}
