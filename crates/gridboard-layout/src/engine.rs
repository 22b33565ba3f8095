// ABOUTME: Grid layout operations for dashboard panels.
// ABOUTME: Places panels in rows and columns on the 24-unit grid without overlap.

use gridboard_core::{GridPos, GRID_WIDTH};

use crate::{GridItem, LayoutItem};

/// Copy `panel` shifted by the given offsets.
///
/// Sizes already set on the panel win; `height`/`width` only fill unset (0)
/// dimensions. The panel's own x/y are kept and shifted, so an already laid
/// out sub-layout can be moved as a whole.
///
/// # Panics
///
/// If `panel` is a section divider and `offset_x` is not 0.
pub fn reposition<P: GridItem>(
    panel: &P,
    offset_x: u32,
    offset_y: u32,
    height: u32,
    width: u32,
) -> P {
    assert!(
        offset_x == 0 || !panel.is_divider(),
        "section divider cannot be offset horizontally (offset_x = {offset_x})"
    );
    let current = panel.position().unwrap_or_default();
    panel.with_position(GridPos {
        x: offset_x.saturating_add(current.x),
        y: offset_y.saturating_add(current.y),
        width: or_default(panel.width(), width),
        height: or_default(panel.height(), height),
    })
}

/// Lay items out left to right on one grid row.
///
/// With `width == 0`, the free columns (24 minus widths already set) are
/// shared evenly, with floor division, among the items that have no width.
/// Groups keep their internal offsets and advance the cursor by their
/// bounding width.
///
/// # Panics
///
/// If any item, at any depth, is a section divider.
pub fn row<P: GridItem>(items: &[LayoutItem<P>], height: u32, width: u32) -> Vec<P> {
    assert!(
        !items.iter().any(LayoutItem::contains_divider),
        "section dividers span the whole grid and cannot be placed in a row"
    );

    let width = if width == 0 { even_width(items) } else { width };
    tracing::trace!(
        "Row of {} items, default size {}x{}",
        items.len(),
        width,
        height
    );

    let mut placed = Vec::new();
    let mut cursor = 0;
    for item in items {
        let start = placed.len();
        place(item, cursor, 0, height, width, &mut placed);
        cursor = placed[start..]
            .iter()
            .map(GridItem::right)
            .max()
            .unwrap_or(cursor);
    }
    placed
}

/// Stack items top to bottom.
///
/// Panels start at x = 0, groups keep their internal x offsets. Each item
/// starts where the bounding height of the previous one ends.
pub fn column<P: GridItem>(items: &[LayoutItem<P>], height: u32, width: u32) -> Vec<P> {
    tracing::trace!(
        "Column of {} items, default size {}x{}",
        items.len(),
        width,
        height
    );

    let mut placed = Vec::new();
    let mut cursor = 0;
    for item in items {
        let start = placed.len();
        place(item, 0, cursor, height, width, &mut placed);
        cursor = placed[start..]
            .iter()
            .map(GridItem::bottom)
            .max()
            .unwrap_or(cursor);
    }
    placed
}

/// Move every panel to the origin, overriding its size with any non-zero
/// `height`/`width`.
pub fn resize<P: GridItem>(panels: &[P], height: u32, width: u32) -> Vec<P> {
    panels
        .iter()
        .map(|panel| {
            panel.with_position(GridPos::sized(
                or_default(width, panel.width()),
                or_default(height, panel.height()),
            ))
        })
        .collect()
}

fn place<P: GridItem>(
    item: &LayoutItem<P>,
    offset_x: u32,
    offset_y: u32,
    height: u32,
    width: u32,
    out: &mut Vec<P>,
) {
    match item {
        LayoutItem::Panel(panel) => out.push(reposition(panel, offset_x, offset_y, height, width)),
        LayoutItem::Group(items) => {
            for item in items {
                place(item, offset_x, offset_y, height, width, out);
            }
        }
    }
}

/// Width for unsized items so the row fills the grid
fn even_width<P: GridItem>(items: &[LayoutItem<P>]) -> u32 {
    let allotted: Vec<u32> = items
        .iter()
        .map(LayoutItem::width)
        .filter(|&w| w != 0)
        .collect();
    let used = allotted.iter().fold(0, |acc: u32, &w| acc.saturating_add(w));
    let free = GRID_WIDTH.saturating_sub(used);
    let unsized_count = (items.len() - allotted.len()).max(1) as u32;
    free / unsized_count
}

/// 0 means unset
fn or_default(value: u32, default: u32) -> u32 {
    if value == 0 {
        default
    } else {
        value
    }
}
