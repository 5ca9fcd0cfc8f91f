//! Tile offset → pixel mapping.
//!
//! The player always sits at the centre tile of the visible window, so a
//! click at offset `(dx, dy)` lands on the centre of the tile `dx` columns and
//! `dy` rows away from that centre tile.

use waypilot_types::ScreenProfile;

/// Converts tile-relative offsets into absolute pixel positions.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMapper {
    profile: ScreenProfile,
}

impl ScreenMapper {
    pub fn new(profile: ScreenProfile) -> Self {
        Self { profile }
    }

    /// True when `(dx, dy)` is inside the visible tile window.
    pub fn is_visible(&self, dx: i32, dy: i32) -> bool {
        let (cols, rows) = self.profile.visible_tiles;
        let half_w = (cols / 2) as i32;
        let half_h = (rows / 2) as i32;
        dx.abs() <= half_w && dy.abs() <= half_h
    }

    /// Pixel centre of the tile at `(dx, dy)`, or `None` when it is off
    /// screen.
    pub fn pixel_for(&self, dx: i32, dy: i32) -> Option<(i32, i32)> {
        if !self.is_visible(dx, dy) {
            return None;
        }
        let ts = self.profile.tile_size as i32;
        let (cols, rows) = self.profile.visible_tiles;
        let col = (cols / 2) as i32 + dx;
        let row = (rows / 2) as i32 + dy;
        let (ox, oy) = self.profile.game_origin;
        Some((ox + col * ts + ts / 2, oy + row * ts + ts / 2))
    }
}
