//! Per-pixel blend functions
//!
//! A blend function takes `(canvas, brush)` and returns the new canvas pixel.
//! They are plain function pointers so any call site can swap one in; there
//! is no state and no dispatch hierarchy.

use serde::{Deserialize, Serialize};

use crate::pixel::{Color, Pixel, PixelOps};

/// `(canvas, brush) -> result`
pub type BlendFn<P> = fn(P, P) -> P;

/// Brush where it has coverage, canvas elsewhere. Default stencil for shapes.
#[inline]
pub fn mask<P: Pixel>(canvas: P, brush: P) -> P {
    if brush.is_transparent() {
        canvas
    } else {
        brush
    }
}

/// Always the brush
#[inline]
pub fn replace<P: Pixel>(_canvas: P, brush: P) -> P {
    brush
}

/// Interpolate canvas toward brush by the brush's alpha
#[inline]
pub fn alpha<P: PixelOps>(canvas: P, brush: P) -> P {
    canvas.lerp_by_alpha(brush)
}

#[inline]
pub fn add<P: PixelOps>(canvas: P, brush: P) -> P {
    PixelOps::add(canvas, brush)
}

#[inline]
pub fn subtract<P: PixelOps>(canvas: P, brush: P) -> P {
    PixelOps::subtract(canvas, brush)
}

#[inline]
pub fn multiply<P: PixelOps>(canvas: P, brush: P) -> P {
    PixelOps::multiply(canvas, brush)
}

/// Keep canvas visibility only where the brush is opaque
#[inline]
pub fn stencil_keep(canvas: Color, brush: Color) -> Color {
    canvas.with_alpha(canvas.a * brush.a)
}

/// Cut canvas visibility where the brush is opaque
#[inline]
pub fn stencil_cut(canvas: Color, brush: Color) -> Color {
    canvas.with_alpha(canvas.a * (1.0 - brush.a))
}

/// Named blend selector, for callers that pick a mode from data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Mask,
    Replace,
    Alpha,
    Add,
    Subtract,
    Multiply,
    StencilKeep,
    StencilCut,
}

impl BlendMode {
    pub const ALL: [BlendMode; 8] = [
        BlendMode::Mask,
        BlendMode::Replace,
        BlendMode::Alpha,
        BlendMode::Add,
        BlendMode::Subtract,
        BlendMode::Multiply,
        BlendMode::StencilKeep,
        BlendMode::StencilCut,
    ];
}

/// The blend table available for a concrete pixel type
pub trait BlendTable: PixelOps {
    /// `None` when the mode has no meaning for this pixel type
    fn blend_fn(mode: BlendMode) -> Option<BlendFn<Self>>;
}

impl BlendTable for u8 {
    fn blend_fn(mode: BlendMode) -> Option<BlendFn<Self>> {
        let f: BlendFn<u8> = match mode {
            BlendMode::Mask => mask::<u8>,
            BlendMode::Replace => replace::<u8>,
            BlendMode::Alpha => alpha::<u8>,
            BlendMode::Add => add::<u8>,
            BlendMode::Subtract => subtract::<u8>,
            BlendMode::Multiply => multiply::<u8>,
            // Stencils work on an alpha channel a bare byte does not have
            BlendMode::StencilKeep | BlendMode::StencilCut => return None,
        };
        Some(f)
    }
}

impl BlendTable for Color {
    fn blend_fn(mode: BlendMode) -> Option<BlendFn<Self>> {
        let f: BlendFn<Color> = match mode {
            BlendMode::Mask => mask::<Color>,
            BlendMode::Replace => replace::<Color>,
            BlendMode::Alpha => alpha::<Color>,
            BlendMode::Add => add::<Color>,
            BlendMode::Subtract => subtract::<Color>,
            BlendMode::Multiply => multiply::<Color>,
            BlendMode::StencilKeep => stencil_keep,
            BlendMode::StencilCut => stencil_cut,
        };
        Some(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_skips_transparent_brush() {
        assert_eq!(mask(7u8, 0), 7);
        assert_eq!(mask(7u8, 3), 3);
        assert_eq!(mask(Color::WHITE, Color::RED.with_alpha(0.0)), Color::WHITE);
        assert_eq!(mask(Color::WHITE, Color::RED), Color::RED);
    }

    #[test]
    fn test_replace_ignores_canvas() {
        assert_eq!(replace(9u8, 0), 0);
        assert_eq!(replace(Color::WHITE, Color::CLEAR), Color::CLEAR);
    }

    #[test]
    fn test_alpha_blend() {
        assert_eq!(alpha(Color::WHITE, Color::BLACK), Color::BLACK);
        let half = alpha(Color::WHITE, Color::BLACK.with_alpha(0.5));
        assert_eq!(half, Color::new(0.5, 0.5, 0.5, 0.75));
        assert_eq!(alpha(10u8, 255), 255);
        assert_eq!(alpha(10u8, 0), 10);
    }

    #[test]
    fn test_arithmetic_blends() {
        assert_eq!(add(250u8, 10), 4);
        assert_eq!(subtract(5u8, 10), 251);
        assert_eq!(multiply(Color::WHITE, Color::RED), Color::RED);
        assert_eq!(add(Color::RED, Color::GREEN), Color::new(1.0, 1.0, 0.0, 2.0));
    }

    #[test]
    fn test_stencils() {
        let canvas = Color::BLUE;
        assert_eq!(stencil_keep(canvas, Color::BLACK), canvas);
        assert_eq!(stencil_keep(canvas, Color::CLEAR).a, 0.0);
        assert_eq!(stencil_cut(canvas, Color::BLACK).a, 0.0);
        assert_eq!(stencil_cut(canvas, Color::CLEAR), canvas);
    }

    #[test]
    fn test_blend_tables() {
        for mode in BlendMode::ALL {
            assert!(<Color as BlendTable>::blend_fn(mode).is_some());
        }
        assert!(<u8 as BlendTable>::blend_fn(BlendMode::StencilCut).is_none());
        let f = <u8 as BlendTable>::blend_fn(BlendMode::Add).unwrap();
        assert_eq!(f(1, 2), 3);
    }

    #[test]
    fn test_mode_names_round_trip_through_json() {
        let json = serde_json::to_string(&BlendMode::StencilKeep).unwrap();
        assert_eq!(json, "\"stencil_keep\"");
        let back: BlendMode = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(back, BlendMode::Alpha);
    }
}
