//! Geometric primitives: Point, Size, Rect.

use serde::{Deserialize, Serialize};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Shift the point by the given deltas.
    #[must_use]
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f32,
    /// Y position of top-left corner
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the origin (top-left) point.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges are
    /// exclusive, so rectangles that share an edge never both claim a point.
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Split off a strip of `width` from the right edge.
    ///
    /// Returns `(rest, strip)`. The strip is clamped to the rectangle width.
    #[must_use]
    pub fn split_right(&self, width: f32) -> (Self, Self) {
        let width = width.clamp(0.0, self.width);
        let rest = Self::new(self.x, self.y, self.width - width, self.height);
        let strip = Self::new(self.right() - width, self.y, width, self.height);
        (rest, strip)
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_point_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(&Point::new(0.0, 0.0)));
        assert!(r.contains_point(&Point::new(9.9, 9.9)));
        assert!(!r.contains_point(&Point::new(10.0, 5.0)));
        assert!(!r.contains_point(&Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_adjacent_rects_never_share_a_point() {
        let top = Rect::new(0.0, 0.0, 100.0, 32.0);
        let below = Rect::new(0.0, 32.0, 100.0, 32.0);
        let edge = Point::new(50.0, 32.0);
        assert!(!top.contains_point(&edge));
        assert!(below.contains_point(&edge));
    }

    #[test]
    fn test_rect_split_right() {
        let r = Rect::new(10.0, 0.0, 100.0, 30.0);
        let (rest, strip) = r.split_right(20.0);
        assert_eq!(rest, Rect::new(10.0, 0.0, 80.0, 30.0));
        assert_eq!(strip, Rect::new(90.0, 0.0, 20.0, 30.0));
    }

    #[test]
    fn test_rect_split_right_clamps() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let (rest, strip) = r.split_right(50.0);
        assert_eq!(rest.width, 0.0);
        assert_eq!(strip.width, 10.0);
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 20.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 30.0));
    }

    #[test]
    fn test_point_offset() {
        assert_eq!(Point::ORIGIN.offset(3.0, 4.0), Point::new(3.0, 4.0));
    }
}
