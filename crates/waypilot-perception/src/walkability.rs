//! Dynamic walkability.
//!
//! The static [`FloorGrid`] only knows about walls.  Before every planning
//! call the movement layer clones it into a [`WalkabilityView`] and blocks the
//! tiles that are occupied right now (live creatures, and corpses when the
//! profile says they block).  The view is rebuilt fresh each cycle and never
//! cached: occupancy changes every tick and floors are small.
//!
//! # Example
//!
//! ```rust
//! use waypilot_perception::walkability::WalkabilityView;
//! use waypilot_types::{FloorGrid, Tile};
//!
//! let floor = FloorGrid::open(7, 3, 3);
//! let mut view = WalkabilityView::from_floor(&floor);
//! view.block(Tile::new(1, 1, 7));
//!
//! assert!(!view.is_walkable(Tile::new(1, 1, 7)));
//! assert!(floor.is_walkable(Tile::new(1, 1, 7))); // static grid untouched
//! ```

use waypilot_types::{FloorGrid, Tile};

use crate::pathfinder::GridView;

/// A mutable, per-tick copy of a floor's walkability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkabilityView {
    z: i32,
    origin: (i32, i32),
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl WalkabilityView {
    /// Clone the static cells of `floor`.
    pub fn from_floor(floor: &FloorGrid) -> Self {
        Self {
            z: floor.z(),
            origin: floor.origin(),
            width: floor.width(),
            height: floor.height(),
            cells: floor.cells().to_vec(),
        }
    }

    /// Clone `floor` and block every tile in `occupied` except `exempt`.
    ///
    /// `exempt` lets a planner path *towards* an occupied tile (e.g. the
    /// creature it is approaching) without ever stepping onto it, since
    /// approach goals are satisfied one tile early.  Static walls stay
    /// blocked even when exempt.
    pub fn with_blockers(
        floor: &FloorGrid,
        occupied: impl IntoIterator<Item = Tile>,
        exempt: Option<Tile>,
    ) -> Self {
        let mut view = Self::from_floor(floor);
        for tile in occupied {
            view.block(tile);
        }
        if let Some(tile) = exempt
            && floor.is_walkable(tile)
        {
            view.unblock(tile);
        }
        view
    }

    /// Mark `tile` unwalkable.  Tiles outside the view are ignored.
    pub fn block(&mut self, tile: Tile) {
        if let Some(i) = GridView::index_of(self, tile) {
            self.cells[i] = false;
        }
    }

    /// Mark `tile` walkable.  Tiles outside the view are ignored.
    pub fn unblock(&mut self, tile: Tile) {
        if let Some(i) = GridView::index_of(self, tile) {
            self.cells[i] = true;
        }
    }

    pub fn is_walkable(&self, tile: Tile) -> bool {
        GridView::index_of(self, tile).is_some_and(|i| self.cells[i])
    }
}

impl GridView for WalkabilityView {
    fn z(&self) -> i32 {
        self.z
    }

    fn origin(&self) -> (i32, i32) {
        self.origin
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn walkable_index(&self, index: usize) -> bool {
        self.cells[index]
    }
}
