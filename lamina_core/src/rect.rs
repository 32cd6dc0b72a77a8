// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer geometry: points, sizes, and axis-aligned rectangles.
//!
//! [`Rect`] is the geometry every scene node carries. Its anchor accessors
//! (`right`, `center`, `bottomleft`, ...) are pure functions of
//! `(x, y, w, h)`. Setters move the rectangle: setting `right` adjusts `x`
//! and never `w`.

use core::fmt;
use core::ops::{Add, Neg, Sub};

/// An integer point or offset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An integer width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Size {
    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Returns the size with negative extents raised to zero.
    #[inline]
    #[must_use]
    pub const fn clamped(self) -> Self {
        Self::new(if self.w < 0 { 0 } else { self.w }, if self.h < 0 { 0 } else { self.h })
    }
}

/// An axis-aligned integer rectangle.
///
/// Width and height are non-negative for every rectangle the scene produces.
/// Overlap tests treat the rectangle as half-open: it covers
/// `left <= x < right` and `top <= y < bottom`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({}, {}, {}, {})", self.x, self.y, self.w, self.h)
    }
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle of the given size at the origin.
    #[inline]
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    // -- Primitive anchors --

    /// Returns the size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Sets the size, keeping the top-left corner.
    #[inline]
    pub fn set_size(&mut self, size: Size) {
        self.w = size.w;
        self.h = size.h;
    }

    /// Returns the top-left corner.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Moves the rectangle so its top-left corner is `p`.
    #[inline]
    pub fn set_pos(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Left edge (same as `x`).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Moves the rectangle so its left edge is at `v`.
    #[inline]
    pub fn set_left(&mut self, v: i32) {
        self.x = v;
    }

    /// Top edge (same as `y`).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Moves the rectangle so its top edge is at `v`.
    #[inline]
    pub fn set_top(&mut self, v: i32) {
        self.y = v;
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Moves the rectangle so its right edge is at `v`.
    #[inline]
    pub fn set_right(&mut self, v: i32) {
        self.x = v - self.w;
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Moves the rectangle so its bottom edge is at `v`.
    #[inline]
    pub fn set_bottom(&mut self, v: i32) {
        self.y = v - self.h;
    }

    /// Horizontal midpoint, rounded toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn midx(&self) -> i32 {
        self.x + self.w.div_euclid(2)
    }

    /// Moves the rectangle so its horizontal midpoint is at `v`.
    #[inline]
    pub fn set_midx(&mut self, v: i32) {
        self.x = v - self.w.div_euclid(2);
    }

    /// Vertical midpoint, rounded toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn midy(&self) -> i32 {
        self.y + self.h.div_euclid(2)
    }

    /// Moves the rectangle so its vertical midpoint is at `v`.
    #[inline]
    pub fn set_midy(&mut self, v: i32) {
        self.y = v - self.h.div_euclid(2);
    }

    // -- Compound anchors --

    /// Top-left corner (same as [`pos`](Self::pos)).
    #[inline]
    #[must_use]
    pub const fn topleft(&self) -> Point {
        self.pos()
    }

    /// Moves the top-left corner to `p`.
    #[inline]
    pub fn set_topleft(&mut self, p: Point) {
        self.set_pos(p);
    }

    /// Midpoint of the top edge.
    #[inline]
    #[must_use]
    pub const fn midtop(&self) -> Point {
        Point::new(self.midx(), self.top())
    }

    /// Moves the midpoint of the top edge to `p`.
    #[inline]
    pub fn set_midtop(&mut self, p: Point) {
        self.set_midx(p.x);
        self.set_top(p.y);
    }

    /// Top-right corner.
    #[inline]
    #[must_use]
    pub const fn topright(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    /// Moves the top-right corner to `p`.
    #[inline]
    pub fn set_topright(&mut self, p: Point) {
        self.set_right(p.x);
        self.set_top(p.y);
    }

    /// Midpoint of the left edge.
    #[inline]
    #[must_use]
    pub const fn midleft(&self) -> Point {
        Point::new(self.left(), self.midy())
    }

    /// Moves the midpoint of the left edge to `p`.
    #[inline]
    pub fn set_midleft(&mut self, p: Point) {
        self.set_left(p.x);
        self.set_midy(p.y);
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.midx(), self.midy())
    }

    /// Moves the center to `p`.
    #[inline]
    pub fn set_center(&mut self, p: Point) {
        self.set_midx(p.x);
        self.set_midy(p.y);
    }

    /// Midpoint of the right edge.
    #[inline]
    #[must_use]
    pub const fn midright(&self) -> Point {
        Point::new(self.right(), self.midy())
    }

    /// Moves the midpoint of the right edge to `p`.
    #[inline]
    pub fn set_midright(&mut self, p: Point) {
        self.set_right(p.x);
        self.set_midy(p.y);
    }

    /// Bottom-left corner.
    #[inline]
    #[must_use]
    pub const fn bottomleft(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    /// Moves the bottom-left corner to `p`.
    #[inline]
    pub fn set_bottomleft(&mut self, p: Point) {
        self.set_left(p.x);
        self.set_bottom(p.y);
    }

    /// Midpoint of the bottom edge.
    #[inline]
    #[must_use]
    pub const fn midbottom(&self) -> Point {
        Point::new(self.midx(), self.bottom())
    }

    /// Moves the midpoint of the bottom edge to `p`.
    #[inline]
    pub fn set_midbottom(&mut self, p: Point) {
        self.set_midx(p.x);
        self.set_bottom(p.y);
    }

    /// Bottom-right corner.
    #[inline]
    #[must_use]
    pub const fn bottomright(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Moves the bottom-right corner to `p`.
    #[inline]
    pub fn set_bottomright(&mut self, p: Point) {
        self.set_right(p.x);
        self.set_bottom(p.y);
    }

    // -- Queries --

    /// Returns `w * h`.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Half-open containment: `left <= p.x < right` and `top <= p.y < bottom`.
    #[inline]
    #[must_use]
    pub const fn collide_point(&self, p: Point) -> bool {
        self.left() <= p.x && p.x < self.right() && self.top() <= p.y && p.y < self.bottom()
    }

    /// Open-interval overlap test. Rectangles that only share an edge do not
    /// collide.
    #[inline]
    #[must_use]
    pub const fn collide_rect(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns the overlapping sub-rectangle, or `None` when the rectangles
    /// do not [collide](Self::collide_rect).
    ///
    /// # Panics
    ///
    /// In debug builds, if either rectangle has a negative width or height
    /// and the two collide. Nodes never carry such rectangles: sizes are
    /// clamped when nodes are created or resized.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if !self.collide_rect(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let w = self.right().min(other.right()) - x;
        let h = self.bottom().min(other.bottom()) - y;
        // Colliding rectangles with non-negative sizes never produce a
        // negative extent.
        debug_assert!(w >= 0 && h >= 0, "negative intersection of {self:?} and {other:?}");
        Some(Self::new(x, y, w, h))
    }

    /// Returns the bounding box of both rectangles.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Returns this rectangle moved by `offset`.
    #[inline]
    #[must_use]
    pub const fn translate(&self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Returns a rectangle of the same size at the origin.
    #[inline]
    #[must_use]
    pub const fn at_origin(&self) -> Self {
        Self::new(0, 0, self.w, self.h)
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        Self::new(
            f64::from(r.left()),
            f64::from(r.top()),
            f64::from(r.right()),
            f64::from(r.bottom()),
        )
    }
}
