// ABOUTME: Layout inputs: the GridItem capability and nested LayoutItem groups.
// ABOUTME: Computes widths, heights, and bounding extents of panels and groups.

use gridboard_core::{GridPos, Panel, GRID_WIDTH, ROW_HEIGHT};

/// What the engine needs to know about a panel.
///
/// Implementors are treated as immutable values: placing one produces a copy
/// through [`GridItem::with_position`].
pub trait GridItem: Clone {
    /// Assigned grid position, `None` if not yet placed
    fn position(&self) -> Option<GridPos>;

    /// Section dividers span the whole grid and are one unit high
    fn is_divider(&self) -> bool;

    /// Copy of `self` carrying `pos`
    fn with_position(&self, pos: GridPos) -> Self;

    /// Width in grid units, 0 when unknown
    fn width(&self) -> u32 {
        if self.is_divider() {
            return GRID_WIDTH;
        }
        self.position().map_or(0, |pos| pos.width)
    }

    /// Height in grid units, 0 when unknown
    fn height(&self) -> u32 {
        if self.is_divider() {
            return ROW_HEIGHT;
        }
        self.position().map_or(0, |pos| pos.height)
    }

    /// Horizontal reach: x + width
    fn right(&self) -> u32 {
        let x = if self.is_divider() {
            0
        } else {
            self.position().map_or(0, |pos| pos.x)
        };
        x.saturating_add(self.width())
    }

    /// Vertical reach: y + height
    fn bottom(&self) -> u32 {
        self.position()
            .map_or(0, |pos| pos.y)
            .saturating_add(self.height())
    }
}

impl GridItem for Panel {
    fn position(&self) -> Option<GridPos> {
        self.grid_pos()
    }

    fn is_divider(&self) -> bool {
        Panel::is_divider(self)
    }

    fn with_position(&self, pos: GridPos) -> Self {
        self.clone().with_grid_pos(pos)
    }
}

/// A panel, or an ordered group of items laid out as one unit
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem<P> {
    Panel(P),
    Group(Vec<LayoutItem<P>>),
}

impl<P: GridItem> LayoutItem<P> {
    /// Flat group of panels, typically the output of `row` or `column`
    pub fn group(panels: impl IntoIterator<Item = P>) -> Self {
        panels.into_iter().collect()
    }

    /// Width of a panel, or the bounding width of a group
    pub fn width(&self) -> u32 {
        match self {
            LayoutItem::Panel(panel) => panel.width(),
            LayoutItem::Group(items) => items.iter().map(LayoutItem::right).max().unwrap_or(0),
        }
    }

    /// Height of a panel, or the bounding height of a group
    pub fn height(&self) -> u32 {
        match self {
            LayoutItem::Panel(panel) => panel.height(),
            LayoutItem::Group(items) => items.iter().map(LayoutItem::bottom).max().unwrap_or(0),
        }
    }

    fn right(&self) -> u32 {
        match self {
            LayoutItem::Panel(panel) => panel.right(),
            LayoutItem::Group(_) => self.width(),
        }
    }

    fn bottom(&self) -> u32 {
        match self {
            LayoutItem::Panel(panel) => panel.bottom(),
            LayoutItem::Group(_) => self.height(),
        }
    }

    /// True if any panel at any depth is a section divider
    pub fn contains_divider(&self) -> bool {
        match self {
            LayoutItem::Panel(panel) => panel.is_divider(),
            LayoutItem::Group(items) => items.iter().any(LayoutItem::contains_divider),
        }
    }

    /// All panels in placement order
    pub fn panels(&self) -> Vec<&P> {
        let mut out = Vec::new();
        collect_panels(self, &mut out);
        out
    }
}

fn collect_panels<'a, P>(item: &'a LayoutItem<P>, out: &mut Vec<&'a P>) {
    match item {
        LayoutItem::Panel(panel) => out.push(panel),
        LayoutItem::Group(items) => {
            for item in items {
                collect_panels(item, out);
            }
        }
    }
}

impl<P> From<P> for LayoutItem<P> {
    fn from(panel: P) -> Self {
        LayoutItem::Panel(panel)
    }
}

impl<P> FromIterator<P> for LayoutItem<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        LayoutItem::Group(iter.into_iter().map(LayoutItem::Panel).collect())
    }
}

/// Wrap each panel as its own layout item
pub fn items<P>(panels: impl IntoIterator<Item = P>) -> Vec<LayoutItem<P>> {
    panels.into_iter().map(LayoutItem::Panel).collect()
}
