//! Discrete world coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four orthogonal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(dx, dy)` of a single step. North decreases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(s)
    }
}

/// A single grid cell of game-world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    /// Floor index.
    pub z: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring tile one step in `dir`, on the same floor.
    pub fn offset(self, dir: Direction) -> Tile {
        let (dx, dy) = dir.delta();
        Tile::new(self.x + dx, self.y + dy, self.z)
    }

    /// Manhattan distance in the `(x, y)` plane, ignoring the floor.
    pub fn manhattan(&self, other: &Tile) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev distance in the `(x, y)` plane, ignoring the floor.
    pub fn chebyshev(&self, other: &Tile) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// True when `other` is on the same floor and touches this tile,
    /// diagonals included. A tile is not adjacent to itself.
    pub fn is_adjacent(&self, other: &Tile) -> bool {
        self.z == other.z && self.chebyshev(other) == 1
    }

    /// Direction of an orthogonal neighbour, or `None` for any other tile.
    pub fn direction_to(&self, other: &Tile) -> Option<Direction> {
        if self.z != other.z {
            return None;
        }
        Direction::ALL
            .into_iter()
            .find(|&d| self.offset(d) == *other)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
