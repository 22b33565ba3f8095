// ABOUTME: Dashboard grid geometry.
// ABOUTME: Grid constants and the GridPos rectangle in grid units.

use serde::{Deserialize, Serialize};

/// Width of the dashboard layout grid, in grid units
pub const GRID_WIDTH: u32 = 24;

/// Height of a section-divider ("row") panel
pub const ROW_HEIGHT: u32 = 1;

/// Panel rectangle in grid units.
///
/// A zero width or height means "unset": layout helpers replace it with
/// whatever default the caller supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A size hint with no placement
    pub const fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Full-width, unit-height position used by section dividers
    pub const fn divider(y: u32) -> Self {
        Self::new(0, y, GRID_WIDTH, ROW_HEIGHT)
    }

    /// Right edge (x + width)
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (y + height)
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when both rectangles share at least one grid cell
    pub fn overlaps(&self, other: &GridPos) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let pos = GridPos::new(2, 3, 4, 5);
        assert_eq!(pos.right(), 6);
        assert_eq!(pos.bottom(), 8);
    }

    #[test]
    fn adjacent_rects_do_not_overlap() {
        let left = GridPos::new(0, 0, 12, 4);
        let right = GridPos::new(12, 0, 12, 4);
        let below = GridPos::new(0, 4, 24, 1);
        assert!(!left.overlaps(&right));
        assert!(!left.overlaps(&below));
        assert!(left.overlaps(&GridPos::new(11, 3, 2, 2)));
    }

    #[test]
    fn empty_rect_never_overlaps() {
        let unsized_pos = GridPos::new(0, 0, 0, 8);
        assert!(!unsized_pos.overlaps(&GridPos::new(0, 0, 24, 8)));
    }

    #[test]
    fn serializes_with_grafana_keys() {
        let json = serde_json::to_value(GridPos::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1, "y": 2, "w": 3, "h": 4}));
    }

    #[test]
    fn partial_position_fills_unset_fields() {
        let pos: GridPos = toml::from_str("w = 12").unwrap();
        assert_eq!(pos, GridPos::sized(12, 0));
    }
}
