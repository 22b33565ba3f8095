// ABOUTME: Grid layout engine for dashboard panels.
// ABOUTME: Rows, columns, and resizing on the fixed 24-unit dashboard grid.

mod engine;
mod item;

pub use engine::{column, reposition, resize, row};
pub use item::{items, GridItem, LayoutItem};
