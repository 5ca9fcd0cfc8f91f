//! Per-floor static walkability.
//!
//! A [`FloorGrid`] is created once when a floor is loaded and is never
//! mutated afterwards; snapshots share it through an `Arc`.  Cells are
//! stored row-major and indexed `[row(y), col(x)]` relative to the grid
//! origin, so world tiles far from `(0, 0)` still map onto a small matrix.

use serde::{Deserialize, Serialize};

use crate::PilotError;
use crate::tile::Tile;

/// Immutable `height × width` walkability matrix for a single floor.
///
/// Deserialization rejects a cell vector whose length is not
/// `width × height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FloorGridRecord", into = "FloorGridRecord")]
pub struct FloorGrid {
    z: i32,
    origin_x: i32,
    origin_y: i32,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl FloorGrid {
    /// Build a grid from rows of walkability flags.
    ///
    /// Rows shorter than the widest row are padded with blocked cells.
    pub fn from_rows(z: i32, origin_x: i32, origin_y: i32, rows: &[Vec<bool>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, &walkable) in row.iter().enumerate() {
                cells[y * width + x] = walkable;
            }
        }
        Self {
            z,
            origin_x,
            origin_y,
            width,
            height,
            cells,
        }
    }

    /// Build a grid from an ASCII picture: `.` is walkable, anything else is
    /// blocked.  Leading and trailing blank lines are ignored and each line
    /// is trimmed, so indented raw strings work.
    ///
    /// ```
    /// use waypilot_types::{FloorGrid, Tile};
    ///
    /// let grid = FloorGrid::parse(7, "
    ///     ..#
    ///     ...
    /// ");
    /// assert!(grid.is_walkable(Tile::new(1, 0, 7)));
    /// assert!(!grid.is_walkable(Tile::new(2, 0, 7)));
    /// ```
    pub fn parse(z: i32, picture: &str) -> Self {
        let rows: Vec<Vec<bool>> = picture
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().map(|c| c == '.').collect())
            .collect();
        Self::from_rows(z, 0, 0, &rows)
    }

    /// A fully walkable grid of the given size with its origin at `(0, 0)`.
    pub fn open(z: i32, width: usize, height: usize) -> Self {
        Self {
            z,
            origin_x: 0,
            origin_y: 0,
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// Return a copy of this grid shifted so that its top-left cell is the
    /// world tile `(origin_x, origin_y)`.
    pub fn with_origin(mut self, origin_x: i32, origin_y: i32) -> Self {
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    /// Raw row-major cells.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Row-major index of `tile`, or `None` when it lies on another floor or
    /// outside the grid.
    pub fn index_of(&self, tile: Tile) -> Option<usize> {
        if tile.z != self.z {
            return None;
        }
        let col = usize::try_from(tile.x - self.origin_x).ok()?;
        let row = usize::try_from(tile.y - self.origin_y).ok()?;
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// World tile of a row-major index.
    pub fn tile_at(&self, index: usize) -> Tile {
        let col = (index % self.width) as i32;
        let row = (index / self.width) as i32;
        Tile::new(self.origin_x + col, self.origin_y + row, self.z)
    }

    /// True when `tile` lies inside the grid and is walkable.
    pub fn is_walkable(&self, tile: Tile) -> bool {
        self.index_of(tile).is_some_and(|i| self.cells[i])
    }
}

/// Wire form of a [`FloorGrid`], checked before it becomes one.
#[derive(Serialize, Deserialize)]
struct FloorGridRecord {
    z: i32,
    origin_x: i32,
    origin_y: i32,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl From<FloorGrid> for FloorGridRecord {
    fn from(g: FloorGrid) -> Self {
        Self {
            z: g.z,
            origin_x: g.origin_x,
            origin_y: g.origin_y,
            width: g.width,
            height: g.height,
            cells: g.cells,
        }
    }
}

impl TryFrom<FloorGridRecord> for FloorGrid {
    type Error = PilotError;

    fn try_from(rec: FloorGridRecord) -> Result<Self, Self::Error> {
        let expected = rec.width.checked_mul(rec.height).ok_or_else(|| {
            PilotError::InvalidGrid(format!("{} × {} overflows", rec.width, rec.height))
        })?;
        if rec.cells.len() != expected {
            return Err(PilotError::InvalidGrid(format!(
                "floor {}: {} cells for a {} × {} grid",
                rec.z,
                rec.cells.len(),
                rec.width,
                rec.height
            )));
        }
        Ok(Self {
            z: rec.z,
            origin_x: rec.origin_x,
            origin_y: rec.origin_y,
            width: rec.width,
            height: rec.height,
            cells: rec.cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_rows_top_down() {
        let grid = FloorGrid::parse(
            7,
            "
            .#.
            ...
            ",
        );
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.is_walkable(Tile::new(0, 0, 7)));
        assert!(!grid.is_walkable(Tile::new(1, 0, 7)));
        assert!(grid.is_walkable(Tile::new(1, 1, 7)));
    }

    #[test]
    fn out_of_bounds_and_other_floor_are_not_walkable() {
        let grid = FloorGrid::open(7, 2, 2);
        assert!(!grid.is_walkable(Tile::new(-1, 0, 7)));
        assert!(!grid.is_walkable(Tile::new(2, 0, 7)));
        assert!(!grid.is_walkable(Tile::new(0, 0, 6)));
    }

    #[test]
    fn origin_shifts_world_coordinates() {
        let grid = FloorGrid::open(7, 3, 3).with_origin(100, 200);
        assert!(grid.is_walkable(Tile::new(100, 200, 7)));
        assert!(grid.is_walkable(Tile::new(102, 202, 7)));
        assert!(!grid.is_walkable(Tile::new(0, 0, 7)));
        let idx = grid.index_of(Tile::new(101, 202, 7)).unwrap();
        assert_eq!(grid.tile_at(idx), Tile::new(101, 202, 7));
    }

    #[test]
    fn ragged_rows_are_padded_blocked() {
        let grid = FloorGrid::from_rows(0, 0, 0, &[vec![true], vec![true, true]]);
        assert_eq!(grid.width(), 2);
        assert!(!grid.is_walkable(Tile::new(1, 0, 0)));
        assert!(grid.is_walkable(Tile::new(1, 1, 0)));
    }

    #[test]
    fn json_with_wrong_cell_count_is_rejected() {
        let bad = r#"{"z":7,"origin_x":0,"origin_y":0,"width":5,"height":5,"cells":[true,true]}"#;
        let err = serde_json::from_str::<FloorGrid>(bad).unwrap_err();
        assert!(err.to_string().contains("2 cells for a 5 × 5 grid"));

        let grid = FloorGrid::parse(7, "..#");
        let text = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<FloorGrid>(&text).unwrap(), grid);
    }
}
