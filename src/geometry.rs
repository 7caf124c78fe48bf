//! Core geometry types: Vec2, Rect.
//!
//! `Vec2` carries the fractional layout inputs (size specs, offsets, padding,
//! drag offsets). `Rect` is the resolved integer pixel rectangle every entity
//! occupies on screen.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector of `f32` components.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Both components zero.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Both components one.
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    /// Size placeholder meaning "use the widget kind's default size".
    pub const DEFAULT_SIZE: Vec2 = Vec2 { x: -1.0, y: -1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both components set to `value`.
    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn scale(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Whether both components are exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2 { x: -self.x, y: -self.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2 { x: self.x * rhs, y: self.y * rhs }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle in screen pixels defined by its top-left corner and size.
///
/// This is the most heavily-used geometry type: destination rectangles,
/// internal (padded) rectangles and collision rectangles are all `Rect`s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const EMPTY: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub const fn center_x(self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical center.
    #[inline]
    pub const fn center_y(self) -> i32 {
        self.y + self.height / 2
    }

    /// The top-left corner as a [`Vec2`].
    #[inline]
    pub fn position(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// The dimensions as a [`Vec2`].
    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Whether the point lies inside this rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.x < self.right() as f32
            && point.y >= self.y as f32
            && point.y < self.bottom() as f32
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `other` is entirely contained within this rectangle.
    #[inline]
    pub const fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection of two rectangles.
    ///
    /// Returns [`Rect::EMPTY`] if they do not overlap.
    #[inline]
    pub const fn intersection(self, other: Rect) -> Rect {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };
        let x2 = if self.right() < other.right() { self.right() } else { other.right() };
        let y2 = if self.bottom() < other.bottom() { self.bottom() } else { other.bottom() };

        let w = x2 - x1;
        let h = y2 - y1;
        if w <= 0 || h <= 0 {
            Rect::EMPTY
        } else {
            Rect { x: x1, y: y1, width: w, height: h }
        }
    }

    /// Compute the smallest rectangle containing both `self` and `other`.
    #[inline]
    pub const fn union(self, other: Rect) -> Rect {
        let x1 = if self.x < other.x { self.x } else { other.x };
        let y1 = if self.y < other.y { self.y } else { other.y };
        let x2 = if self.right() > other.right() { self.right() } else { other.right() };
        let y2 = if self.bottom() > other.bottom() { self.bottom() } else { other.bottom() };
        Rect { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    /// Translate the rectangle by whole pixels.
    #[inline]
    pub const fn translate(self, dx: i32, dy: i32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, width: self.width, height: self.height }
    }

    /// Contract the rectangle by `padding.x` on the left and right sides and
    /// `padding.y` on the top and bottom. Dimensions clamp at zero.
    #[inline]
    pub fn shrink(self, padding: Vec2) -> Rect {
        let px = padding.x as i32;
        let py = padding.y as i32;
        Rect {
            x: self.x + px,
            y: self.y + py,
            width: (self.width - px * 2).max(0),
            height: (self.height - py * 2).max(0),
        }
    }

    /// Expand the rectangle by `margin` pixels on every side.
    #[inline]
    pub const fn grow(self, margin: i32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2,
            height: self.height + margin * 2,
        }
    }

    /// Move this rectangle so it lies inside `bounds`, keeping its size.
    ///
    /// When the rectangle is larger than `bounds` the top-left edge wins.
    #[inline]
    pub fn clamp_into(self, bounds: Rect) -> Rect {
        let x = self.x.min(bounds.right() - self.width).max(bounds.x);
        let y = self.y.min(bounds.bottom() - self.height).max(bounds.y);
        Rect { x, y, width: self.width, height: self.height }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
