//! Integer geometry for pixel-space placement
//!
//! Everything the compositor does happens on whole pixels, so there is no
//! float geometry here: a 2D integer vector for positions and pivots, and an
//! axis-aligned integer rectangle with half-open `[min, max)` extents.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A point or offset in integer pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntVector2 {
    pub x: i32,
    pub y: i32,
}

impl IntVector2 {
    pub const ZERO: IntVector2 = IntVector2 { x: 0, y: 0 };
    pub const ONE: IntVector2 = IntVector2 { x: 1, y: 1 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Swap the two components
    #[inline]
    pub const fn transposed(self) -> Self {
        Self { x: self.y, y: self.x }
    }
}

impl Add for IntVector2 {
    type Output = IntVector2;

    #[inline]
    fn add(self, rhs: IntVector2) -> IntVector2 {
        IntVector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for IntVector2 {
    #[inline]
    fn add_assign(&mut self, rhs: IntVector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for IntVector2 {
    type Output = IntVector2;

    #[inline]
    fn sub(self, rhs: IntVector2) -> IntVector2 {
        IntVector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for IntVector2 {
    #[inline]
    fn sub_assign(&mut self, rhs: IntVector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<i32> for IntVector2 {
    type Output = IntVector2;

    #[inline]
    fn mul(self, rhs: i32) -> IntVector2 {
        IntVector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for IntVector2 {
    type Output = IntVector2;

    #[inline]
    fn neg(self) -> IntVector2 {
        IntVector2::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for IntVector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned integer rectangle covering columns `[x_min, x_max)` and rows
/// `[y_min, y_max)`.
///
/// Width and height may be zero or negative; that is how an empty
/// intersection is reported. Use [`IntRect::is_empty`] before touching pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRect {
    pub x_min: i32,
    pub y_min: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    #[inline]
    pub const fn new(x_min: i32, y_min: i32, width: i32, height: i32) -> Self {
        Self {
            x_min,
            y_min,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Build from min (inclusive) and max (exclusive) corners
    #[inline]
    pub const fn from_min_max(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self::new(x_min, y_min, x_max - x_min, y_max - y_min)
    }

    #[inline]
    pub const fn x_max(&self) -> i32 {
        self.x_min + self.width
    }

    #[inline]
    pub const fn y_max(&self) -> i32 {
        self.y_min + self.height
    }

    #[inline]
    pub const fn min(&self) -> IntVector2 {
        IntVector2::new(self.x_min, self.y_min)
    }

    /// True when the rectangle covers no pixels
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Pixel count, zero for empty rectangles
    #[inline]
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x < self.x_max() && y >= self.y_min && y < self.y_max()
    }

    /// True when `other` lies entirely inside this rectangle
    #[inline]
    pub const fn contains_rect(&self, other: &IntRect) -> bool {
        other.x_min >= self.x_min
            && other.y_min >= self.y_min
            && other.x_max() <= self.x_max()
            && other.y_max() <= self.y_max()
    }

    /// Overlap of two rectangles, clamped min/max.
    ///
    /// Non-overlapping inputs give a rectangle with `width < 1` or
    /// `height < 1`; the result is not normalized.
    #[inline]
    pub fn intersect(&self, other: &IntRect) -> IntRect {
        IntRect::from_min_max(
            self.x_min.max(other.x_min),
            self.y_min.max(other.y_min),
            self.x_max().min(other.x_max()),
            self.y_max().min(other.y_max()),
        )
    }

    /// Translate by `(dx, dy)`
    #[inline]
    pub const fn moved(&self, dx: i32, dy: i32) -> IntRect {
        IntRect::new(self.x_min + dx, self.y_min + dy, self.width, self.height)
    }

    /// Translate by a vector
    #[inline]
    pub const fn offset(&self, by: IntVector2) -> IntRect {
        self.moved(by.x, by.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = IntVector2::new(3, -2);
        let b = IntVector2::new(1, 5);
        assert_eq!(a + b, IntVector2::new(4, 3));
        assert_eq!(a - b, IntVector2::new(2, -7));
        assert_eq!(a * 3, IntVector2::new(9, -6));
        assert_eq!(-a, IntVector2::new(-3, 2));
        assert_eq!(a.transposed(), IntVector2::new(-2, 3));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = IntRect::new(2, 3, 4, 5);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 7));
        assert!(!r.contains(5, 8));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, -3, 10, 6);
        assert_eq!(a.intersect(&b), IntRect::new(5, 0, 5, 3));
        assert_eq!(b.intersect(&a), a.intersect(&b));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = IntRect::new(0, 0, 4, 4);
        let touching = IntRect::new(4, 0, 4, 4);
        let far = IntRect::new(20, 20, 2, 2);
        assert!(a.intersect(&touching).is_empty());
        assert_eq!(a.intersect(&touching).width, 0);
        assert!(a.intersect(&far).is_empty());
        assert!(a.intersect(&far).width < 0);
        assert_eq!(a.intersect(&far).area(), 0);
    }

    #[test]
    fn test_moved_and_offset() {
        let r = IntRect::new(1, 2, 3, 4);
        assert_eq!(r.moved(-1, 5), IntRect::new(0, 7, 3, 4));
        assert_eq!(r.offset(IntVector2::new(2, 2)), IntRect::new(3, 4, 3, 4));
        assert_eq!(r.x_max(), 4);
        assert_eq!(r.y_max(), 6);
    }

    #[test]
    fn test_contains_rect() {
        let outer = IntRect::from_size(8, 8);
        assert!(outer.contains_rect(&IntRect::new(0, 0, 8, 8)));
        assert!(outer.contains_rect(&IntRect::new(2, 2, 3, 3)));
        assert!(!outer.contains_rect(&IntRect::new(6, 6, 3, 1)));
        assert!(!outer.contains_rect(&IntRect::new(-1, 0, 2, 2)));
    }
}
