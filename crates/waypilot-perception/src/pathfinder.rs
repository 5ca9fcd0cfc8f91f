//! Grid pathfinding.
//!
//! Classic A* over a 4-connected grid: Manhattan heuristic, unit edge cost.
//! The heuristic is admissible and consistent for unit orthogonal moves, so
//! the first time the goal is popped its path is optimal.
//!
//! # Conventions
//!
//! - The returned path includes both `start` and `goal`.
//! - `start == goal` returns an empty path; callers check "already there"
//!   before planning.
//! - An unreachable, blocked or out-of-bounds goal returns an empty path.
//! - The start tile is always treated as passable (the player is standing on
//!   it, whatever the grid says).
//!
//! # Buffer reuse
//!
//! Cost, predecessor and closed tables live on the [`Pathfinder`] and only
//! grow.  Instead of clearing them every call, each entry carries the
//! generation it was written in; a bumped generation invalidates them all.
//!
//! # Example
//!
//! ```rust
//! use waypilot_perception::Pathfinder;
//! use waypilot_types::{FloorGrid, Tile};
//!
//! let floor = FloorGrid::open(7, 5, 5);
//! let mut finder = Pathfinder::new();
//! let path = finder.find_path(&floor, Tile::new(0, 0, 7), Tile::new(4, 4, 7));
//! assert_eq!(path.len(), 9);
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;
use waypilot_types::{Direction, FloorGrid, Tile};

// ────────────────────────────────────────────────────────────────────────────
// GridView
// ────────────────────────────────────────────────────────────────────────────

/// Read access to a row-major walkability matrix anchored in world space.
pub trait GridView {
    fn z(&self) -> i32;
    fn origin(&self) -> (i32, i32);
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Walkability of the cell at a row-major index known to be in bounds.
    fn walkable_index(&self, index: usize) -> bool;

    fn len(&self) -> usize {
        self.width() * self.height()
    }

    fn index_of(&self, tile: Tile) -> Option<usize> {
        if tile.z != self.z() {
            return None;
        }
        let (ox, oy) = self.origin();
        let col = usize::try_from(tile.x - ox).ok()?;
        let row = usize::try_from(tile.y - oy).ok()?;
        (col < self.width() && row < self.height()).then(|| row * self.width() + col)
    }

    fn tile_at(&self, index: usize) -> Tile {
        let (ox, oy) = self.origin();
        let col = (index % self.width()) as i32;
        let row = (index / self.width()) as i32;
        Tile::new(ox + col, oy + row, self.z())
    }
}

impl GridView for FloorGrid {
    fn z(&self) -> i32 {
        FloorGrid::z(self)
    }

    fn origin(&self) -> (i32, i32) {
        FloorGrid::origin(self)
    }

    fn width(&self) -> usize {
        FloorGrid::width(self)
    }

    fn height(&self) -> usize {
        FloorGrid::height(self)
    }

    fn walkable_index(&self, index: usize) -> bool {
        self.cells()[index]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pathfinder
// ────────────────────────────────────────────────────────────────────────────

/// Open-set entry: `(f, h, insertion sequence, cell index)`, min-ordered.
type OpenEntry = Reverse<(u32, u32, u64, usize)>;

/// Reusable A* planner.
#[derive(Debug, Default)]
pub struct Pathfinder {
    g_cost: Vec<u32>,
    came_from: Vec<usize>,
    /// Generation in which `g_cost`/`came_from` were last written.
    seen: Vec<u32>,
    /// Generation in which the cell was expanded.
    closed: Vec<u32>,
    generation: u32,
    open: BinaryHeap<OpenEntry>,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest orthogonal path from `start` to `goal` on `grid`.
    ///
    /// See the module docs for the empty-path conventions.
    pub fn find_path(&mut self, grid: &impl GridView, start: Tile, goal: Tile) -> Vec<Tile> {
        if start == goal {
            return Vec::new();
        }
        let (Some(start_idx), Some(goal_idx)) = (grid.index_of(start), grid.index_of(goal)) else {
            trace!(%start, %goal, "start or goal outside grid");
            return Vec::new();
        };
        if !grid.walkable_index(goal_idx) {
            trace!(%goal, "goal tile blocked");
            return Vec::new();
        }

        self.prepare(grid.len());
        let stamp = self.generation;
        let mut seq: u64 = 0;

        self.seen[start_idx] = stamp;
        self.g_cost[start_idx] = 0;
        self.came_from[start_idx] = start_idx;
        let h0 = start.manhattan(&goal);
        self.open.push(Reverse((h0, h0, seq, start_idx)));

        while let Some(Reverse((_, _, _, idx))) = self.open.pop() {
            if self.closed[idx] == stamp {
                continue;
            }
            self.closed[idx] = stamp;

            if idx == goal_idx {
                return self.reconstruct(grid, start_idx, goal_idx);
            }

            let here = grid.tile_at(idx);
            let next_cost = self.g_cost[idx] + 1;
            for dir in Direction::ALL {
                let Some(n) = grid.index_of(here.offset(dir)) else {
                    continue;
                };
                if !grid.walkable_index(n) || self.closed[n] == stamp {
                    continue;
                }
                if self.seen[n] == stamp && self.g_cost[n] <= next_cost {
                    continue;
                }
                self.seen[n] = stamp;
                self.g_cost[n] = next_cost;
                self.came_from[n] = idx;
                let h = grid.tile_at(n).manhattan(&goal);
                seq += 1;
                self.open.push(Reverse((next_cost + h, h, seq, n)));
            }
        }

        trace!(%start, %goal, "no path");
        Vec::new()
    }

    /// Grow the buffers to `cells` and start a new generation.
    fn prepare(&mut self, cells: usize) {
        if self.g_cost.len() < cells {
            self.g_cost.resize(cells, 0);
            self.came_from.resize(cells, 0);
            self.seen.resize(cells, 0);
            self.closed.resize(cells, 0);
        }
        self.open.clear();
        if self.generation == u32::MAX {
            self.seen.fill(0);
            self.closed.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
    }

    fn reconstruct(&self, grid: &impl GridView, start_idx: usize, goal_idx: usize) -> Vec<Tile> {
        let mut path = vec![grid.tile_at(goal_idx)];
        let mut idx = goal_idx;
        while idx != start_idx {
            idx = self.came_from[idx];
            path.push(grid.tile_at(idx));
        }
        path.reverse();
        path
    }
}
