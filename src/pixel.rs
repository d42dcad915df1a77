//! Pixel formats the compositor is generic over
//!
//! Two formats are used in practice: a single byte treated as its own alpha
//! (masks, stencils) and a four-channel float color. Anything else can join
//! by implementing [`Pixel`], plus [`PixelOps`] if the arithmetic blend
//! functions are needed.

use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Minimum contract for a pixel stored in a [`PixelBuffer`](crate::PixelBuffer)
pub trait Pixel: Copy + PartialEq + Default + Debug {
    /// The zero value: what cropping writes and what fresh buffers hold
    const TRANSPARENT: Self;

    /// True when the pixel contributes nothing (zero byte, zero alpha)
    fn is_transparent(&self) -> bool;
}

/// Per-channel arithmetic used by the arithmetic blend functions.
///
/// No clamping happens here: bytes wrap mod 256, floats are unbounded.
pub trait PixelOps: Pixel {
    fn add(self, other: Self) -> Self;
    fn subtract(self, other: Self) -> Self;
    fn multiply(self, other: Self) -> Self;
    /// Interpolate from `self` toward `brush` by the brush's own alpha
    fn lerp_by_alpha(self, brush: Self) -> Self;
}

impl Pixel for u8 {
    const TRANSPARENT: Self = 0;

    #[inline]
    fn is_transparent(&self) -> bool {
        *self == 0
    }
}

impl PixelOps for u8 {
    #[inline]
    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    #[inline]
    fn subtract(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }

    #[inline]
    fn multiply(self, other: Self) -> Self {
        self.wrapping_mul(other)
    }

    /// The brush byte is its own coverage, so 255 replaces and 0 keeps
    #[inline]
    fn lerp_by_alpha(self, brush: Self) -> Self {
        lerp_u8(self, brush, brush as f32 / 255.0)
    }
}

/// Linear interpolation between two bytes, truncating toward zero
#[inline]
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

/// Linear RGBA color with float channels, nominally in `0.0..=1.0`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Convert from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Convert to 8-bit channels, clamping and rounding each one
    pub fn to_rgba8(self) -> (u8, u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b), q(self.a))
    }

    /// Same color with a different alpha
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Interpolate all four channels; `t` is clamped to `0.0..=1.0`
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl Add for Color {
    type Output = Color;

    #[inline]
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for Color {
    type Output = Color;

    #[inline]
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul for Color {
    type Output = Color;

    #[inline]
    fn mul(self, rhs: Color) -> Color {
        Color::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl Pixel for Color {
    const TRANSPARENT: Self = Color::CLEAR;

    #[inline]
    fn is_transparent(&self) -> bool {
        self.a == 0.0
    }
}

impl PixelOps for Color {
    #[inline]
    fn add(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn subtract(self, other: Self) -> Self {
        self - other
    }

    #[inline]
    fn multiply(self, other: Self) -> Self {
        self * other
    }

    #[inline]
    fn lerp_by_alpha(self, brush: Self) -> Self {
        self.lerp(brush, brush.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_arithmetic_wraps() {
        assert_eq!(PixelOps::add(200u8, 100), 44);
        assert_eq!(PixelOps::subtract(10u8, 20), 246);
        assert_eq!(PixelOps::multiply(16u8, 17), 16);
    }

    #[test]
    fn test_byte_lerp_by_alpha() {
        assert_eq!(0u8.lerp_by_alpha(255), 255);
        assert_eq!(200u8.lerp_by_alpha(0), 200);
        // 100 + (128 - 100) * 128/255 = 114.05...
        assert_eq!(100u8.lerp_by_alpha(128), 114);
    }

    #[test]
    fn test_color_lerp_endpoints_are_exact() {
        assert_eq!(Color::WHITE.lerp(Color::BLACK, 1.0), Color::BLACK);
        assert_eq!(Color::WHITE.lerp(Color::BLACK, 0.0), Color::WHITE);
        assert_eq!(Color::WHITE.lerp(Color::RED, 5.0), Color::RED);
    }

    #[test]
    fn test_color_arithmetic_is_unclamped() {
        let c = Color::WHITE + Color::WHITE;
        assert_eq!(c, Color::new(2.0, 2.0, 2.0, 2.0));
        let d = Color::BLACK - Color::WHITE;
        assert_eq!(d.r, -1.0);
    }

    #[test]
    fn test_transparency() {
        assert!(0u8.is_transparent());
        assert!(!1u8.is_transparent());
        assert!(Color::CLEAR.is_transparent());
        assert!(Color::RED.with_alpha(0.0).is_transparent());
        assert!(!Color::BLACK.is_transparent());
        assert_eq!(Color::default(), Color::TRANSPARENT);
    }

    #[test]
    fn test_rgba8_conversion() {
        assert_eq!(Color::from_rgba8(255, 0, 255, 0), Color::new(1.0, 0.0, 1.0, 0.0));
        assert_eq!(Color::new(1.5, 0.5, -1.0, 1.0).to_rgba8(), (255, 128, 0, 255));
    }
}
