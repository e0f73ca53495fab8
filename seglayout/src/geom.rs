// Copyright 2026 the Seglayout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry and the source-to-destination coordinate transform.

use crate::util::mul_div;
use crate::Error;

/// A point in integer layout or device units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with exclusive right and bottom edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl Rect {
    /// Creates a new rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle with its top-left corner at the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width of the rectangle.
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns true if the rectangle encloses no area.
    pub const fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Returns true if `point` lies inside the rectangle.
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// Maps measurements made in a source rectangle onto a destination rectangle.
///
/// Segments are measured in the units of the graphics context (the source space, with the
/// segment's top-left corner at the source origin). Drawing and hit-testing happen in the
/// destination space, so every such call carries a transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transform {
    src: Rect,
    dst: Rect,
}

impl Transform {
    /// Creates a transform from `src` to `dst`.
    ///
    /// Both rectangles must have a non-zero width and height.
    pub fn new(src: Rect, dst: Rect) -> Result<Self, Error> {
        if src.width() == 0 || src.height() == 0 || dst.width() == 0 || dst.height() == 0 {
            return Err(Error::invalid_argument(
                "transform rectangles must have a non-zero size",
            ));
        }
        Ok(Self { src, dst })
    }

    /// A transform that maps a unit square onto itself.
    pub const fn identity() -> Self {
        let unit = Rect::new(0, 0, 1, 1);
        Self {
            src: unit,
            dst: unit,
        }
    }

    /// A transform that only translates by `(dx, dy)`.
    pub const fn translate(dx: i32, dy: i32) -> Self {
        Self {
            src: Rect::new(0, 0, 1, 1),
            dst: Rect::new(dx, dy, dx + 1, dy + 1),
        }
    }

    /// The source rectangle.
    pub fn src(&self) -> Rect {
        self.src
    }

    /// The destination rectangle.
    pub fn dst(&self) -> Rect {
        self.dst
    }

    /// Returns a transform whose source origin is moved by `dx` source units.
    ///
    /// Used to draw a segment at a horizontal offset within a line.
    pub fn offset_source(&self, dx: i32, dy: i32) -> Self {
        Self {
            src: Rect::new(
                self.src.left - dx,
                self.src.top - dy,
                self.src.right - dx,
                self.src.bottom - dy,
            ),
            dst: self.dst,
        }
    }

    /// Maps a source x coordinate to the destination.
    pub fn map_x(&self, x: i32) -> i32 {
        self.dst.left + mul_div(x - self.src.left, self.dst.width(), self.src.width())
    }

    /// Maps a source y coordinate to the destination.
    pub fn map_y(&self, y: i32) -> i32 {
        self.dst.top + mul_div(y - self.src.top, self.dst.height(), self.src.height())
    }

    /// Maps a destination x coordinate back to the source.
    pub fn unmap_x(&self, x: i32) -> i32 {
        self.src.left + mul_div(x - self.dst.left, self.src.width(), self.dst.width())
    }

    /// Maps a destination y coordinate back to the source.
    pub fn unmap_y(&self, y: i32) -> i32 {
        self.src.top + mul_div(y - self.dst.top, self.src.height(), self.dst.height())
    }

    /// Scales a horizontal source length to destination units.
    pub fn scale_x(&self, len: i32) -> i32 {
        mul_div(len, self.dst.width(), self.src.width())
    }

    /// Scales a vertical source length to destination units.
    pub fn scale_y(&self, len: i32) -> i32 {
        mul_div(len, self.dst.height(), self.src.height())
    }

    /// Maps a source point to the destination.
    pub fn map_point(&self, point: Point) -> Point {
        Point::new(self.map_x(point.x), self.map_y(point.y))
    }

    /// Maps a destination point back to the source.
    pub fn unmap_point(&self, point: Point) -> Point {
        Point::new(self.unmap_x(point.x), self.unmap_y(point.y))
    }

    /// Maps a source rectangle to the destination.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.map_x(rect.left),
            self.map_y(rect.top),
            self.map_x(rect.right),
            self.map_y(rect.bottom),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_maps_and_unmaps() {
        let transform =
            Transform::new(Rect::new(0, 0, 72, 72), Rect::new(10, 20, 106, 116)).unwrap();
        assert_eq!(transform.map_point(Point::new(36, 72)), Point::new(58, 116));
        assert_eq!(transform.unmap_point(Point::new(58, 116)), Point::new(36, 72));
        assert_eq!(transform.scale_x(720), 960, "96/72 scale");
    }

    #[test]
    fn transform_rejects_empty_rectangles() {
        let err = Transform::new(Rect::new(0, 0, 0, 10), Rect::from_size(10, 10)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument, "zero width source");
    }

    #[test]
    fn translate_only_moves() {
        let transform = Transform::translate(5, -3);
        assert_eq!(transform.map_point(Point::new(10, 10)), Point::new(15, 7));
        assert_eq!(transform.scale_x(17), 17, "no scaling");
    }

    #[test]
    fn offset_source_shifts_origin() {
        let transform = Transform::translate(100, 0).offset_source(30, 0);
        assert_eq!(transform.map_x(0), 130, "segment origin lands 30 units in");
    }
}
