//! Integer geometry primitives for the layout tree.
//!
//! All layout math is done in whole pixels so that repeated interactive
//! resizing never accumulates rounding drift.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Point / Dimensions
// ============================================================================

/// A point in output-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({},{})", self.x, self.y) }
}

/// Width and height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    /// Create a new dimensions pair.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle with position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0, 0, 0, 0) }

    /// X coordinate one past the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 { self.x + self.width }

    /// Y coordinate one past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 { self.y + self.height }

    /// Size of this rectangle.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions { Dimensions::new(self.width, self.height) }

    /// Check if this rectangle contains a point.
    ///
    /// The right and bottom edges are exclusive, so a point on the border
    /// between two adjacent rectangles belongs to exactly one of them.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Get the center point of this rectangle.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Return this rectangle translated by the given offsets.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink the given insets off each side, never going below zero size.
    #[must_use]
    pub fn inset(&self, top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0),
            (self.height - top - bottom).max(0),
        )
    }

    /// Clamp this rectangle inside `bounds`.
    ///
    /// The size only shrinks when it exceeds the bounds; the position is then
    /// moved the minimum distance needed to fit. Nothing is rescaled.
    #[must_use]
    pub fn clamped_within(&self, bounds: &Self) -> Self {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.clamp(bounds.x, bounds.right() - width);
        let y = self.y.clamp(bounds.y, bounds.bottom() - height);
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

// ============================================================================
// Edges
// ============================================================================

bitflags::bitflags! {
    /// Set of rectangle sides allowed to move during a resize.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u8 {
        const TOP    = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT   = 0b0100;
        const RIGHT  = 0b1000;
        const ALL    = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Edges {
    /// Whether exactly one of left/right is moving, so width can change.
    #[must_use]
    pub const fn moves_width(self) -> bool {
        self.contains(Self::LEFT) != self.contains(Self::RIGHT)
    }

    /// Whether exactly one of top/bottom is moving, so height can change.
    #[must_use]
    pub const fn moves_height(self) -> bool {
        self.contains(Self::TOP) != self.contains(Self::BOTTOM)
    }

    /// Keep only the horizontal-axis edges.
    #[must_use]
    pub const fn horizontal(self) -> Self {
        self.intersection(Self::LEFT.union(Self::RIGHT))
    }

    /// Keep only the vertical-axis edges.
    #[must_use]
    pub const fn vertical(self) -> Self { self.intersection(Self::TOP.union(Self::BOTTOM)) }

    /// Cursor name hint for this edge mask, following the xcursor naming.
    #[must_use]
    pub fn cursor_name(self) -> &'static str {
        match (
            self.contains(Self::TOP),
            self.contains(Self::BOTTOM),
            self.contains(Self::LEFT),
            self.contains(Self::RIGHT),
        ) {
            (true, false, true, false) => "nw-resize",
            (true, false, false, true) => "ne-resize",
            (false, true, true, false) => "sw-resize",
            (false, true, false, true) => "se-resize",
            (true, false, false, false) => "n-resize",
            (false, true, false, false) => "s-resize",
            (false, false, true, false) => "w-resize",
            (false, false, false, true) => "e-resize",
            _ => "default",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_and_center() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.center(), Point::new(60, 45));
    }

    #[test]
    fn test_rect_contains_excludes_far_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 5)));
        assert!(!r.contains(Point::new(5, 10)));
        assert!(!r.contains(Point::new(-1, 5)));
    }

    #[test]
    fn test_adjacent_rects_share_no_point() {
        let left = Rect::new(0, 0, 500, 800);
        let right = Rect::new(500, 0, 500, 800);
        let border = Point::new(500, 400);
        assert!(!left.contains(border));
        assert!(right.contains(border));
    }

    #[test]
    fn test_clamped_within_moves_without_rescaling() {
        let bounds = Rect::new(0, 0, 1000, 800);
        let r = Rect::new(900, 700, 300, 200);
        assert_eq!(r.clamped_within(&bounds), Rect::new(700, 600, 300, 200));

        let huge = Rect::new(-50, -50, 2000, 100);
        assert_eq!(huge.clamped_within(&bounds), Rect::new(0, 0, 1000, 100));
    }

    #[test]
    fn test_inset_never_negative() {
        let r = Rect::new(0, 0, 100, 100);
        assert_eq!(r.inset(30, 0, 0, 0), Rect::new(0, 30, 100, 70));
        assert_eq!(r.inset(80, 0, 80, 0).height, 0);
    }

    #[test]
    fn test_edges_axis_predicates() {
        assert!(Edges::LEFT.moves_width());
        assert!(!(Edges::LEFT | Edges::RIGHT).moves_width());
        assert!(!Edges::empty().moves_height());
        assert!((Edges::BOTTOM | Edges::RIGHT).moves_height());
        assert_eq!((Edges::TOP | Edges::LEFT).horizontal(), Edges::LEFT);
        assert_eq!((Edges::TOP | Edges::LEFT).vertical(), Edges::TOP);
    }

    #[test]
    fn test_edges_cursor_name() {
        assert_eq!((Edges::BOTTOM | Edges::RIGHT).cursor_name(), "se-resize");
        assert_eq!(Edges::LEFT.cursor_name(), "w-resize");
        assert_eq!(Edges::empty().cursor_name(), "default");
    }
}
