//! Generic row-major pixel storage
//!
//! A [`PixelBuffer`] is the canvas every other type writes into: a flat
//! `width * height` array indexed as `y * width + x`, plus a dirty flag the
//! display-facing collaborator consumes with [`PixelBuffer::apply`].

use std::fmt;

use crate::blend::BlendFn;
use crate::error::{RasterError, Result};
use crate::geometry::IntRect;
use crate::pixel::Pixel;

// ============================================================================
// PixelBuffer
// ============================================================================

/// Row-major pixel array with a dirty flag
#[derive(Clone)]
pub struct PixelBuffer<P> {
    pixels: Vec<P>,
    width: i32,
    height: i32,
    dirty: bool,
}

fn validate_size(width: i32, height: i32) -> Result<usize> {
    if width < 1 || height < 1 {
        return Err(RasterError::InvalidSize { width, height });
    }
    Ok(width as usize * height as usize)
}

impl<P: Pixel> PixelBuffer<P> {
    /// Create a buffer filled with the transparent pixel
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::filled(width, height, P::TRANSPARENT)
    }

    /// Create a buffer filled with `value`
    pub fn filled(width: i32, height: i32, value: P) -> Result<Self> {
        let len = validate_size(width, height)?;
        Ok(Self {
            pixels: vec![value; len],
            width,
            height,
            dirty: true,
        })
    }

    /// Wrap already-decoded row-major pixel data
    pub fn from_pixels(width: i32, height: i32, pixels: Vec<P>) -> Result<Self> {
        let len = validate_size(width, height)?;
        if pixels.len() != len {
            return Err(RasterError::DataLength {
                expected: len,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            dirty: true,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The whole buffer as a rectangle at the origin
    #[inline]
    pub fn bounds(&self) -> IntRect {
        IntRect::from_size(self.width, self.height)
    }

    /// Raw row-major pixels, for upload by the display side
    #[inline]
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush point for the display side: clears the dirty flag and reports
    /// whether there was anything to upload
    pub fn apply(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Reallocate at a new size. Contents are reset to transparent.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let len = validate_size(width, height)?;
        self.pixels.clear();
        self.pixels.resize(len, P::TRANSPARENT);
        self.width = width;
        self.height = height;
        self.dirty = true;
        Ok(())
    }

    /// Index of (x, y). Out-of-range coordinates are a caller bug and panic.
    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            x >= 0 && x < self.width && y >= 0 && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Panic unless `rect` lies fully inside the buffer
    fn assert_inside(&self, rect: &IntRect) {
        assert!(
            self.bounds().contains_rect(rect),
            "rect {:?} out of bounds for {}x{} buffer",
            rect,
            self.width,
            self.height
        );
    }

    /// Read one pixel
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> P {
        self.pixels[self.index(x, y)]
    }

    /// Write one pixel
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, value: P) {
        let idx = self.index(x, y);
        self.pixels[idx] = value;
        self.dirty = true;
    }

    /// Copy a rectangle out into a tightly packed row-major vector
    pub fn get_region(&self, rect: IntRect) -> Result<Vec<P>> {
        if rect.is_empty() {
            return Err(RasterError::InvalidRect(rect));
        }
        self.assert_inside(&rect);

        let w = rect.width as usize;
        let mut out = Vec::with_capacity(rect.area());
        for row in rect.y_min..rect.y_max() {
            let start = self.index(rect.x_min, row);
            out.extend_from_slice(&self.pixels[start..start + w]);
        }
        Ok(out)
    }

    /// Copy tightly packed row-major data into a rectangle
    pub fn set_region(&mut self, rect: IntRect, data: &[P]) -> Result<()> {
        if rect.is_empty() {
            return Err(RasterError::InvalidRect(rect));
        }
        if data.len() != rect.area() {
            return Err(RasterError::DataLength {
                expected: rect.area(),
                actual: data.len(),
            });
        }
        self.assert_inside(&rect);

        let w = rect.width as usize;
        for (row, src) in (rect.y_min..rect.y_max()).zip(data.chunks_exact(w)) {
            let start = self.index(rect.x_min, row);
            self.pixels[start..start + w].copy_from_slice(src);
        }
        self.dirty = true;
        Ok(())
    }

    /// Fill the whole buffer
    pub fn clear(&mut self, value: P) {
        self.pixels.fill(value);
        self.dirty = true;
    }

    /// Fill a sub-rectangle
    pub fn clear_rect(&mut self, value: P, rect: IntRect) -> Result<()> {
        if rect.is_empty() {
            return Err(RasterError::InvalidRect(rect));
        }
        self.assert_inside(&rect);

        let w = rect.width as usize;
        for row in rect.y_min..rect.y_max() {
            let start = self.index(rect.x_min, row);
            self.pixels[start..start + w].fill(value);
        }
        self.dirty = true;
        Ok(())
    }

    /// Fill columns `[x0, x1]` (inclusive, either order) of row `y`.
    /// Parts of the span outside the buffer are dropped.
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, value: P) {
        if y < 0 || y >= self.height {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let start = x0.max(0);
        let end = x1.min(self.width - 1);
        if start > end {
            return;
        }
        let idx = self.index(start, y);
        self.pixels[idx..=idx + (end - start) as usize].fill(value);
        self.dirty = true;
    }

    /// Blend `source` into this buffer: for every pixel of `dest_rect`,
    /// `self = blend(self, source)` with `source` sampled at the same offset
    /// inside `source_rect`.
    ///
    /// Both rectangles must have identical size and lie inside their
    /// buffers; anything else is a logic error upstream and panics.
    pub fn blend(
        &mut self,
        source: &PixelBuffer<P>,
        blend: BlendFn<P>,
        dest_rect: IntRect,
        source_rect: IntRect,
    ) {
        if !self.prepare_blend(source.bounds(), dest_rect, source_rect) {
            return;
        }

        let w = dest_rect.width as usize;
        for row in 0..dest_rect.height {
            let d = self.index(dest_rect.x_min, dest_rect.y_min + row);
            let s = source.index(source_rect.x_min, source_rect.y_min + row);
            let canvas = &mut self.pixels[d..d + w];
            let brush = &source.pixels[s..s + w];
            for (c, &b) in canvas.iter_mut().zip(brush) {
                *c = blend(*c, b);
            }
        }
        self.dirty = true;
    }

    /// [`blend`](Self::blend) where the brush lives in this same buffer.
    ///
    /// Pixels are processed row-major, read then write, so overlapping
    /// rectangles see partially updated data. The result in that case is
    /// order-dependent and not guaranteed.
    pub fn blend_within(&mut self, blend: BlendFn<P>, dest_rect: IntRect, source_rect: IntRect) {
        if !self.prepare_blend(self.bounds(), dest_rect, source_rect) {
            return;
        }

        let w = dest_rect.width as usize;
        for row in 0..dest_rect.height {
            let d = self.index(dest_rect.x_min, dest_rect.y_min + row);
            let s = self.index(source_rect.x_min, source_rect.y_min + row);
            for i in 0..w {
                self.pixels[d + i] = blend(self.pixels[d + i], self.pixels[s + i]);
            }
        }
        self.dirty = true;
    }

    /// Shared blend preconditions. Returns false for an empty region.
    fn prepare_blend(&self, source_bounds: IntRect, dest_rect: IntRect, source_rect: IntRect) -> bool {
        assert!(
            dest_rect.width == source_rect.width && dest_rect.height == source_rect.height,
            "blend rect size mismatch: dest {:?} vs source {:?}",
            dest_rect,
            source_rect
        );
        if dest_rect.is_empty() {
            return false;
        }
        self.assert_inside(&dest_rect);
        assert!(
            source_bounds.contains_rect(&source_rect),
            "source rect {:?} out of bounds for {}x{} buffer",
            source_rect,
            source_bounds.width,
            source_bounds.height
        );
        true
    }
}

impl<P> fmt::Debug for PixelBuffer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend;
    use crate::pixel::Color;

    fn ramp(width: i32, height: i32) -> PixelBuffer<u8> {
        let data = (0..width * height).map(|i| i as u8).collect();
        PixelBuffer::from_pixels(width, height, data).unwrap()
    }

    #[test]
    fn test_new_rejects_degenerate_sizes() {
        assert!(matches!(
            PixelBuffer::<u8>::new(0, 4),
            Err(RasterError::InvalidSize { width: 0, height: 4 })
        ));
        assert!(PixelBuffer::<Color>::new(3, -1).is_err());
        let buf = PixelBuffer::<Color>::new(3, 2).unwrap();
        assert_eq!(buf.pixels().len(), 6);
        assert!(buf.pixels().iter().all(|p| *p == Color::CLEAR));
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let err = PixelBuffer::from_pixels(2, 2, vec![0u8; 3]).unwrap_err();
        assert!(matches!(err, RasterError::DataLength { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_row_major_indexing() {
        let buf = ramp(4, 3);
        assert_eq!(buf.get_pixel(0, 0), 0);
        assert_eq!(buf.get_pixel(3, 0), 3);
        assert_eq!(buf.get_pixel(0, 1), 4);
        assert_eq!(buf.get_pixel(2, 2), 10);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_pixel_out_of_bounds_panics() {
        let buf = ramp(4, 3);
        let _ = buf.get_pixel(4, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_pixel_negative_panics() {
        let mut buf = ramp(4, 3);
        buf.set_pixel(0, -1, 1);
    }

    #[test]
    fn test_dirty_flag_and_apply() {
        let mut buf = ramp(2, 2);
        assert!(buf.apply());
        assert!(!buf.is_dirty());
        assert!(!buf.apply());
        buf.set_pixel(1, 1, 9);
        assert!(buf.is_dirty());
        assert!(buf.apply());
    }

    #[test]
    fn test_get_and_set_region() {
        let mut buf = ramp(4, 4);
        let rect = IntRect::new(1, 1, 2, 2);
        assert_eq!(buf.get_region(rect).unwrap(), vec![5, 6, 9, 10]);

        buf.apply();
        buf.set_region(rect, &[100, 101, 102, 103]).unwrap();
        assert!(buf.is_dirty());
        assert_eq!(buf.get_pixel(1, 1), 100);
        assert_eq!(buf.get_pixel(2, 1), 101);
        assert_eq!(buf.get_pixel(1, 2), 102);
        assert_eq!(buf.get_pixel(2, 2), 103);
        assert_eq!(buf.get_pixel(3, 2), 11);
    }

    #[test]
    fn test_region_validation() {
        let mut buf = ramp(4, 4);
        assert!(matches!(
            buf.get_region(IntRect::new(0, 0, 0, 2)),
            Err(RasterError::InvalidRect(_))
        ));
        assert!(matches!(
            buf.set_region(IntRect::new(0, 0, 2, 2), &[1, 2, 3]),
            Err(RasterError::DataLength { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_clear_rect() {
        let mut buf = PixelBuffer::filled(4, 3, 1u8).unwrap();
        buf.clear_rect(7, IntRect::new(1, 1, 3, 2)).unwrap();
        assert_eq!(buf.pixels(), &[1, 1, 1, 1, 1, 7, 7, 7, 1, 7, 7, 7]);
        buf.clear(0);
        assert!(buf.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buf = ramp(2, 2);
        buf.apply();
        buf.resize(3, 5).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 5));
        assert_eq!(buf.pixels().len(), 15);
        assert!(buf.is_dirty());
        assert!(buf.resize(0, 5).is_err());
    }

    #[test]
    fn test_hline_clips_to_buffer() {
        let mut buf = PixelBuffer::<u8>::new(4, 2).unwrap();
        buf.hline(5, -3, 1, 9);
        buf.hline(0, 3, 7, 9);
        assert_eq!(buf.pixels(), &[0, 0, 0, 0, 9, 9, 9, 9]);
    }

    #[test]
    fn test_blend_uses_source_offset() {
        let mut canvas = PixelBuffer::<u8>::new(4, 4).unwrap();
        let brush = ramp(3, 3);
        canvas.blend(
            &brush,
            blend::replace,
            IntRect::new(2, 1, 2, 2),
            IntRect::new(1, 0, 2, 2),
        );
        assert_eq!(canvas.get_pixel(2, 1), 1);
        assert_eq!(canvas.get_pixel(3, 1), 2);
        assert_eq!(canvas.get_pixel(2, 2), 4);
        assert_eq!(canvas.get_pixel(3, 2), 5);
        assert_eq!(canvas.get_pixel(1, 1), 0);
    }

    #[test]
    fn test_blend_applies_function_per_pixel() {
        let mut canvas = PixelBuffer::filled(2, 1, 10u8).unwrap();
        let brush = PixelBuffer::from_pixels(2, 1, vec![0u8, 5]).unwrap();
        canvas.blend(&brush, blend::add, canvas.bounds(), brush.bounds());
        assert_eq!(canvas.pixels(), &[10, 15]);
    }

    #[test]
    #[should_panic(expected = "size mismatch")]
    fn test_blend_size_mismatch_panics() {
        let mut canvas = PixelBuffer::<u8>::new(4, 4).unwrap();
        let brush = ramp(4, 4);
        canvas.blend(
            &brush,
            blend::replace,
            IntRect::new(0, 0, 2, 2),
            IntRect::new(0, 0, 3, 2),
        );
    }

    #[test]
    fn test_blend_within_disjoint_rects() {
        let mut buf = ramp(4, 1);
        buf.blend_within(blend::replace, IntRect::new(2, 0, 2, 1), IntRect::new(0, 0, 2, 1));
        assert_eq!(buf.pixels(), &[0, 1, 0, 1]);
    }
}
