//! Bresenham sweeps of a stamp sprite, with stippling

use std::mem::swap;

use crate::blend::BlendFn;
use crate::error::{RasterError, Result};
use crate::geometry::IntVector2;
use crate::pixel::Pixel;
use crate::sprite::Sprite;

use super::Pool;

/// Walk the Bresenham line from `start` to `end` inclusive, calling `plot`
/// for every pixel whose stipple counter is a multiple of `stride`.
///
/// The walk always runs along the major axis from the low end, so the pixel
/// set does not depend on endpoint order. The counter is assigned from
/// `start`, though: pixel `k` steps away from `start` gets `offset + k`
/// regardless of which way the walk actually went. Returns the counter of
/// the `end` pixel, which is where a continuing segment picks up.
///
/// A `stride` below 1 is rejected before anything is plotted.
pub fn walk_line(
    start: IntVector2,
    end: IntVector2,
    stride: i32,
    offset: i32,
    mut plot: impl FnMut(IntVector2),
) -> Result<i32> {
    if stride < 1 {
        return Err(RasterError::InvalidStipple(stride));
    }

    let (mut x0, mut y0, mut x1, mut y1) = (start.x, start.y, end.x, end.y);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        swap(&mut x0, &mut y0);
        swap(&mut x1, &mut y1);
    }
    let reversed = x0 > x1;
    if reversed {
        swap(&mut x0, &mut x1);
        swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let ystep = if y0 < y1 { 1 } else { -1 };
    let mut err = dx / 2;
    let mut y = y0;

    for (step, x) in (x0..=x1).enumerate() {
        let step = step as i32;
        let counter = if reversed { offset + dx - step } else { offset + step };
        if counter.rem_euclid(stride) == 0 {
            plot(if steep {
                IntVector2::new(y, x)
            } else {
                IntVector2::new(x, y)
            });
        }

        err -= dy;
        if err < 0 {
            y += ystep;
            err += dx;
        }
    }

    Ok(offset + dx)
}

impl<P: Pixel> Pool<P> {
    /// Stamp `stamp` along the line `start -> end` into a new sprite.
    ///
    /// The result is just large enough for the swept path (`|delta| +
    /// stamp size` per axis), cleared to `background`, and pivoted so that
    /// drawing it at `start` puts every stamp where it was swept. Stamps are
    /// placed only where the stipple counter is a multiple of
    /// `stipple_stride`; the returned counter continues the dash pattern on
    /// the next segment of the same stroke.
    pub fn sweep(
        &mut self,
        stamp: &Sprite<P>,
        start: IntVector2,
        end: IntVector2,
        blend: BlendFn<P>,
        background: P,
        stipple_stride: i32,
        stipple_offset: i32,
    ) -> Result<(Sprite<P>, i32)> {
        if stipple_stride < 1 {
            return Err(RasterError::InvalidStipple(stipple_stride));
        }

        let min = IntVector2::new(start.x.min(end.x), start.y.min(end.y));
        let width = (end.x - start.x).abs() + stamp.width();
        let height = (end.y - start.y).abs() + stamp.height();
        let pivot = start - min + stamp.local_pivot();

        let dest = self.get_sprite(width, height, pivot)?;
        dest.clear(background);

        let next = walk_line(start, end, stipple_stride, stipple_offset, |at| {
            dest.blend(stamp, blend, start, at);
        })?;
        Ok((dest, next))
    }
}
