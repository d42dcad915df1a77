//! Shape generators: filled rectangles, discs and thick lines

use crate::error::Result;
use crate::geometry::IntVector2;
use crate::pixel::Pixel;
use crate::sprite::Sprite;

use super::Pool;

/// Rasterize a filled disc of `diameter` pixels into the top-left
/// `diameter x diameter` block of `sprite`.
///
/// Midpoint circle with span filling: `(x, y)` walks the octant from
/// `(radius, 0)` and every step fills the four horizontal spans its
/// eight-way reflections bound. Even diameters have no center pixel, so the
/// positive side of each span is pulled in by one (`offset`) to keep the disc
/// symmetric about the half-pixel center. Parts outside the sprite are clipped.
pub fn rasterize_circle<P: Pixel>(sprite: &Sprite<P>, diameter: i32, value: P) {
    if diameter < 1 {
        return;
    }

    let radius = diameter / 2;
    let offset = 1 - diameter % 2;
    let c = radius;

    let span = |x0: i32, x1: i32, row: i32| {
        // An even disc's innermost reflected span is empty
        if x0 <= x1 {
            sprite.hline_local(x0, x1, row, value);
        }
    };

    let mut x = radius;
    let mut y = 0;
    let mut radius_error = 1 - x;

    while x >= y {
        span(c - x, c + x - offset, c + y - offset);
        span(c - x, c + x - offset, c - y);
        span(c - y, c + y - offset, c + x - offset);
        span(c - y, c + y - offset, c - x);

        y += 1;
        if radius_error < 0 {
            radius_error += 2 * y + 1;
        } else {
            x -= 1;
            radius_error += 2 * (y - x) + 1;
        }
    }
}

impl<P: Pixel> Pool<P> {
    /// Vend a sprite filled with `value`
    pub fn get_rect(
        &mut self,
        width: i32,
        height: i32,
        pivot: IntVector2,
        value: P,
    ) -> Result<Sprite<P>> {
        let sprite = self.get_sprite(width, height, pivot)?;
        sprite.clear(value);
        Ok(sprite)
    }

    /// Vend a `diameter x diameter` disc stamp pivoted at its center, on the
    /// pool's transparent background
    pub fn get_circle(&mut self, diameter: i32, value: P) -> Result<Sprite<P>> {
        let radius = diameter / 2;
        let sprite = self.get_sprite(diameter, diameter, IntVector2::new(radius, radius))?;
        sprite.clear(self.transparent);
        rasterize_circle(&sprite, diameter, value);
        Ok(sprite)
    }

    /// A round-capped line: a `thickness` disc swept from `start` to `end`
    /// with the pool's mask blend.
    ///
    /// The result is anchored so that drawing it at `start` reproduces the
    /// stroke at its world position.
    pub fn generate_line(
        &mut self,
        start: IntVector2,
        end: IntVector2,
        value: P,
        thickness: i32,
    ) -> Result<Sprite<P>> {
        let stamp = self.get_circle(thickness, value)?;
        let (mask, background) = (self.mask, self.transparent);
        let swept = self.sweep(&stamp, start, end, mask, background, 1, 0);
        self.free_sprite(stamp)?;
        Ok(swept?.0)
    }
}
