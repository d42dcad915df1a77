//! Placed regions ("sprites")
//!
//! A [`Sprite`] is a rectangle plus a pivot inside a shared [`PixelBuffer`].
//! Several sprites may view one buffer (cells of an atlas, a stamp and the
//! canvas it was cut from), so the buffer is held as `Rc<RefCell<..>>` and
//! sprite methods take `&self`.
//!
//! Placement works in a shared world pixel space: a sprite drawn at
//! `position` covers `rect` translated by `position - pivot`. Blending two
//! sprites intersects their world rectangles and maps the overlap back into
//! each buffer's own coordinates.

use std::cell::RefCell;
use std::rc::Rc;

use crate::blend::BlendFn;
use crate::error::{RasterError, Result};
use crate::geometry::{IntRect, IntVector2};
use crate::pixel::Pixel;
use crate::pixel_buffer::PixelBuffer;

/// A pixel buffer that sprites and the pool can share
pub type SharedBuffer<P> = Rc<RefCell<PixelBuffer<P>>>;

/// Wrap a buffer for sharing
pub fn share<P>(buffer: PixelBuffer<P>) -> SharedBuffer<P> {
    Rc::new(RefCell::new(buffer))
}

/// Rectangle + pivot view into a shared pixel buffer
#[derive(Debug, Clone)]
pub struct Sprite<P> {
    buffer: SharedBuffer<P>,
    rect: IntRect,
    pivot: IntVector2,
}

impl<P: Pixel> Sprite<P> {
    /// View `rect` of `buffer`. The pivot is in buffer coordinates and may
    /// lie outside `rect`.
    pub fn new(buffer: SharedBuffer<P>, rect: IntRect, pivot: IntVector2) -> Result<Self> {
        if rect.is_empty() {
            return Err(RasterError::InvalidRect(rect));
        }
        let (width, height) = {
            let buf = buffer.borrow();
            (buf.width(), buf.height())
        };
        if !IntRect::from_size(width, height).contains_rect(&rect) {
            return Err(RasterError::RegionOutOfBounds {
                rect,
                width,
                height,
            });
        }
        Ok(Self {
            buffer,
            rect,
            pivot,
        })
    }

    /// A sprite covering a whole, newly shared buffer
    pub fn from_buffer(buffer: PixelBuffer<P>, pivot: IntVector2) -> Self {
        let rect = buffer.bounds();
        Self {
            buffer: share(buffer),
            rect,
            pivot,
        }
    }

    /// Another view into the same buffer
    pub fn cell(&self, rect: IntRect, pivot: IntVector2) -> Result<Self> {
        Self::new(Rc::clone(&self.buffer), rect, pivot)
    }

    #[inline]
    pub fn buffer(&self) -> &SharedBuffer<P> {
        &self.buffer
    }

    pub(crate) fn into_buffer(self) -> SharedBuffer<P> {
        self.buffer
    }

    #[inline]
    pub fn rect(&self) -> IntRect {
        self.rect
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.rect.height
    }

    /// Pivot in buffer coordinates
    #[inline]
    pub fn pivot(&self) -> IntVector2 {
        self.pivot
    }

    /// Pivot relative to the rect's top-left corner
    #[inline]
    pub fn local_pivot(&self) -> IntVector2 {
        self.pivot - self.rect.min()
    }

    #[inline]
    pub fn set_pivot(&mut self, pivot: IntVector2) {
        self.pivot = pivot;
    }

    /// Where this sprite's pixels land when drawn at `position`
    #[inline]
    pub fn world_rect(&self, position: IntVector2) -> IntRect {
        self.rect.offset(position - self.pivot)
    }

    /// Brush `brush` (drawn at `brush_position`) onto this sprite (drawn at
    /// `canvas_position`). Only the overlapping pixels are touched.
    ///
    /// Returns `false` when the two do not overlap by at least one pixel in
    /// each axis; that is an ordinary outcome near canvas edges, not an error.
    pub fn blend(
        &self,
        brush: &Sprite<P>,
        blend: BlendFn<P>,
        canvas_position: IntVector2,
        brush_position: IntVector2,
    ) -> bool {
        let canvas_world = self.world_rect(canvas_position);
        let brush_world = brush.world_rect(brush_position);
        let overlap = canvas_world.intersect(&brush_world);
        if overlap.is_empty() {
            return false;
        }

        let dest = overlap.offset(self.rect.min() - canvas_world.min());
        let source = overlap.offset(brush.rect.min() - brush_world.min());

        if Rc::ptr_eq(&self.buffer, &brush.buffer) {
            self.buffer.borrow_mut().blend_within(blend, dest, source);
        } else {
            let brush_buf = brush.buffer.borrow();
            self.buffer
                .borrow_mut()
                .blend(&brush_buf, blend, dest, source);
        }
        true
    }

    /// Blend with both sprites anchored at the world origin
    #[inline]
    pub fn blend_at_origin(&self, brush: &Sprite<P>, blend: BlendFn<P>) -> bool {
        self.blend(brush, blend, IntVector2::ZERO, IntVector2::ZERO)
    }

    /// Zero every pixel of this sprite that falls outside `bounds`, using the
    /// same placement rules as [`blend`](Self::blend).
    ///
    /// Returns `false` and leaves the pixels untouched when there is no
    /// overlap at all.
    pub fn crop(
        &self,
        bounds: &Sprite<P>,
        canvas_position: IntVector2,
        bounds_position: IntVector2,
    ) -> bool {
        let canvas_world = self.world_rect(canvas_position);
        let overlap = canvas_world.intersect(&bounds.world_rect(bounds_position));
        if overlap.is_empty() {
            return false;
        }

        let keep = overlap.offset(self.rect.min() - canvas_world.min());
        let r = self.rect;
        let bands = [
            // above and below the kept block, full width
            IntRect::from_min_max(r.x_min, r.y_min, r.x_max(), keep.y_min),
            IntRect::from_min_max(r.x_min, keep.y_max(), r.x_max(), r.y_max()),
            // left and right of it, kept rows only
            IntRect::from_min_max(r.x_min, keep.y_min, keep.x_min, keep.y_max()),
            IntRect::from_min_max(keep.x_max(), keep.y_min, r.x_max(), keep.y_max()),
        ];

        let mut buf = self.buffer.borrow_mut();
        for band in bands.iter().filter(|b| !b.is_empty()) {
            let cleared = buf.clear_rect(P::TRANSPARENT, *band);
            debug_assert!(cleared.is_ok(), "crop band {:?} rejected", band);
        }
        true
    }

    /// Fill this sprite's rectangle
    pub fn clear(&self, value: P) {
        let cleared = self.buffer.borrow_mut().clear_rect(value, self.rect);
        debug_assert!(cleared.is_ok(), "sprite rect {:?} rejected", self.rect);
    }

    /// Pivot-relative read. Outside the sprite's rect, `default` is returned.
    pub fn get_pixel(&self, x: i32, y: i32, default: P) -> P {
        let bx = self.pivot.x + x;
        let by = self.pivot.y + y;
        if self.rect.contains(bx, by) {
            self.buffer.borrow().get_pixel(bx, by)
        } else {
            default
        }
    }

    /// Write in buffer coordinates. Panics outside the buffer.
    pub fn set_pixel_absolute(&self, x: i32, y: i32, value: P) {
        self.buffer.borrow_mut().set_pixel(x, y, value);
    }

    /// Read relative to the rect's top-left corner. Panics outside the rect.
    pub fn get_local(&self, x: i32, y: i32) -> P {
        self.assert_local(x, y);
        self.buffer
            .borrow()
            .get_pixel(self.rect.x_min + x, self.rect.y_min + y)
    }

    /// Write relative to the rect's top-left corner. Panics outside the rect.
    pub fn set_local(&self, x: i32, y: i32, value: P) {
        self.assert_local(x, y);
        self.buffer
            .borrow_mut()
            .set_pixel(self.rect.x_min + x, self.rect.y_min + y, value);
    }

    /// Fill local columns `[x0, x1]` of local row `y`, clipped to the rect
    pub fn hline_local(&self, x0: i32, x1: i32, y: i32, value: P) {
        if y < 0 || y >= self.rect.height {
            return;
        }
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let start = x0.max(0);
        let end = x1.min(self.rect.width - 1);
        if start > end {
            return;
        }
        self.buffer.borrow_mut().hline(
            self.rect.x_min + start,
            self.rect.x_min + end,
            self.rect.y_min + y,
            value,
        );
    }

    /// The sprite's pixels, row-major, `width * height` long
    pub fn to_vec(&self) -> Vec<P> {
        let region = self.buffer.borrow().get_region(self.rect);
        debug_assert!(region.is_ok(), "sprite rect {:?} rejected", self.rect);
        region.unwrap_or_default()
    }

    fn assert_local(&self, x: i32, y: i32) {
        assert!(
            x >= 0 && x < self.rect.width && y >= 0 && y < self.rect.height,
            "local pixel ({}, {}) outside {}x{} sprite",
            x,
            y,
            self.rect.width,
            self.rect.height
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend;
    use crate::pixel::Color;

    fn solid(width: i32, height: i32, value: u8, pivot: IntVector2) -> Sprite<u8> {
        Sprite::from_buffer(PixelBuffer::filled(width, height, value).unwrap(), pivot)
    }

    #[test]
    fn test_new_validates_rect() {
        let buf = share(PixelBuffer::<u8>::new(4, 4).unwrap());
        assert!(Sprite::new(Rc::clone(&buf), IntRect::new(1, 1, 3, 3), IntVector2::ZERO).is_ok());
        assert!(matches!(
            Sprite::new(Rc::clone(&buf), IntRect::new(2, 2, 3, 3), IntVector2::ZERO),
            Err(RasterError::RegionOutOfBounds { .. })
        ));
        assert!(matches!(
            Sprite::new(buf, IntRect::new(0, 0, 0, 3), IntVector2::ZERO),
            Err(RasterError::InvalidRect(_))
        ));
    }

    #[test]
    fn test_world_rect_uses_pivot() {
        let s = solid(4, 2, 1, IntVector2::new(2, 1));
        assert_eq!(s.world_rect(IntVector2::new(10, 10)), IntRect::new(8, 9, 4, 2));
        assert_eq!(s.local_pivot(), IntVector2::new(2, 1));
    }

    #[test]
    fn test_blend_centered_brush() {
        let canvas = solid(5, 5, 0, IntVector2::ZERO);
        let brush = solid(3, 3, 9, IntVector2::new(1, 1));
        assert!(canvas.blend(&brush, blend::replace, IntVector2::ZERO, IntVector2::new(2, 2)));
        let px = canvas.to_vec();
        for y in 0..5 {
            for x in 0..5 {
                let inside = (1..=3).contains(&x) && (1..=3).contains(&y);
                assert_eq!(px[(y * 5 + x) as usize], if inside { 9 } else { 0 }, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_blend_clips_at_canvas_edge() {
        let canvas = solid(4, 4, 0, IntVector2::ZERO);
        let brush = solid(3, 3, 5, IntVector2::new(1, 1));
        // Centered on the corner: only the 2x2 lower-right of the brush lands
        assert!(canvas.blend(&brush, blend::replace, IntVector2::ZERO, IntVector2::ZERO));
        assert_eq!(canvas.get_local(0, 0), 5);
        assert_eq!(canvas.get_local(1, 1), 5);
        assert_eq!(canvas.get_local(2, 0), 0);
        assert_eq!(canvas.get_local(0, 2), 0);
    }

    #[test]
    fn test_blend_miss_returns_false_and_touches_nothing() {
        let canvas = solid(4, 4, 3, IntVector2::ZERO);
        let brush = solid(2, 2, 8, IntVector2::ZERO);
        canvas.buffer().borrow_mut().apply();
        // Touching edge: zero-width overlap
        assert!(!canvas.blend(&brush, blend::replace, IntVector2::ZERO, IntVector2::new(4, 0)));
        assert!(!canvas.blend(&brush, blend::replace, IntVector2::ZERO, IntVector2::new(-2, -2)));
        assert!(canvas.to_vec().iter().all(|&p| p == 3));
        assert!(!canvas.buffer().borrow().is_dirty());
    }

    #[test]
    fn test_blend_between_atlas_cells() {
        let atlas = PixelBuffer::from_pixels(4, 2, vec![1u8, 2, 0, 0, 3, 4, 0, 0]).unwrap();
        let left = Sprite::from_buffer(atlas, IntVector2::ZERO);
        let left = left.cell(IntRect::new(0, 0, 2, 2), IntVector2::ZERO).unwrap();
        let right = left.cell(IntRect::new(2, 0, 2, 2), IntVector2::new(2, 0)).unwrap();
        assert!(right.blend(&left, blend::replace, IntVector2::ZERO, IntVector2::ZERO));
        assert_eq!(right.to_vec(), vec![1, 2, 3, 4]);
        assert_eq!(left.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_crop_zeroes_outside_bounds() {
        let stamp = solid(4, 4, 7, IntVector2::ZERO);
        let bounds = solid(2, 3, 1, IntVector2::ZERO);
        assert!(stamp.crop(&bounds, IntVector2::ZERO, IntVector2::new(1, 1)));
        let expected = vec![
            0, 0, 0, 0, //
            0, 7, 7, 0, //
            0, 7, 7, 0, //
            0, 7, 7, 0,
        ];
        assert_eq!(stamp.to_vec(), expected);
    }

    #[test]
    fn test_crop_without_overlap_is_noop() {
        let stamp = solid(2, 2, 7, IntVector2::ZERO);
        let bounds = solid(2, 2, 1, IntVector2::ZERO);
        assert!(!stamp.crop(&bounds, IntVector2::ZERO, IntVector2::new(10, 10)));
        assert_eq!(stamp.to_vec(), vec![7; 4]);
    }

    #[test]
    fn test_tolerant_get_pixel() {
        let s = Sprite::from_buffer(
            PixelBuffer::from_pixels(3, 1, vec![Color::RED, Color::GREEN, Color::BLUE]).unwrap(),
            IntVector2::new(1, 0),
        );
        assert_eq!(s.get_pixel(-1, 0, Color::WHITE), Color::RED);
        assert_eq!(s.get_pixel(1, 0, Color::WHITE), Color::BLUE);
        assert_eq!(s.get_pixel(2, 0, Color::WHITE), Color::WHITE);
        assert_eq!(s.get_pixel(0, -1, Color::WHITE), Color::WHITE);
    }

    #[test]
    fn test_clear_only_touches_rect() {
        let buf = share(PixelBuffer::filled(3, 3, 1u8).unwrap());
        let s = Sprite::new(Rc::clone(&buf), IntRect::new(1, 1, 2, 2), IntVector2::ZERO).unwrap();
        s.clear(0);
        assert_eq!(buf.borrow().pixels(), &[1, 1, 1, 1, 0, 0, 1, 0, 0]);
        s.set_pixel_absolute(0, 0, 5);
        assert_eq!(buf.borrow().get_pixel(0, 0), 5);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_clear_after_buffer_shrinks_panics() {
        let s = solid(4, 4, 1, IntVector2::ZERO);
        let cell = s.cell(IntRect::new(2, 2, 2, 2), IntVector2::ZERO).unwrap();
        s.buffer().borrow_mut().resize(2, 2).unwrap();
        cell.clear(0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_to_vec_after_buffer_shrinks_panics() {
        let s = solid(4, 4, 1, IntVector2::ZERO);
        s.buffer().borrow_mut().resize(3, 3).unwrap();
        let _ = s.to_vec();
    }

    #[test]
    fn test_set_pivot_moves_placement() {
        let canvas = solid(4, 1, 0, IntVector2::ZERO);
        let mut brush = solid(1, 1, 6, IntVector2::ZERO);
        brush.set_pivot(IntVector2::new(-2, 0));
        assert_eq!(brush.world_rect(IntVector2::ZERO), IntRect::new(2, 0, 1, 1));
        assert!(canvas.blend(&brush, blend::replace, IntVector2::ZERO, IntVector2::ZERO));
        assert_eq!(canvas.to_vec(), vec![0, 0, 6, 0]);
        assert_eq!(brush.get_pixel(2, 0, 9), 6);
    }

    #[test]
    fn test_self_blend_does_not_double_borrow() {
        let s = solid(2, 2, 4, IntVector2::ZERO);
        assert!(s.blend(&s.clone(), blend::add, IntVector2::ZERO, IntVector2::ZERO));
        assert_eq!(s.to_vec(), vec![8; 4]);
    }
}
