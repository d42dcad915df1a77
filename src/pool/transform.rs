//! Quarter-turn rotation, shear, and shear-based rotation
//!
//! Everything here is a pure pixel remap into a freshly vended sprite; there
//! is no resampling. Arbitrary angles are faked with the classic three-shear
//! decomposition, which moves whole pixels and so never loses or duplicates
//! any of them.

use crate::error::Result;
use crate::geometry::IntVector2;
use crate::pixel::Pixel;
use crate::sprite::Sprite;

use super::Pool;

/// Per-row (or per-column) integer displacement for a shear of `amount`,
/// shifted so it is never negative within `extra`
fn skew(amount: f32, extra: i32, distance: i32) -> i32 {
    let shift = (amount * distance as f32).round() as i32;
    if amount < 0.0 {
        extra + shift
    } else {
        shift
    }
}

/// Growth along the sheared axis
fn shear_extent(amount: f32, other_dimension: i32) -> i32 {
    (other_dimension as f32 * amount.abs()).ceil() as i32
}

impl<P: Pixel> Pool<P> {
    /// Rotate a quarter turn clockwise (in y-down pixel space).
    ///
    /// Source pixel `(x, y)` lands at `(h - 1 - y, x)` of a `h x w`
    /// sprite. The pivot becomes `(new_height - 1 - pivot.y, pivot.x)`,
    /// which for non-square sprites is not the pixel it sat on; use
    /// [`rotate90_pinned`](Self::rotate90_pinned) to keep that pixel.
    /// Four turns restore the pivot either way.
    pub fn rotate90_once(&mut self, src: &Sprite<P>) -> Result<Sprite<P>> {
        let lp = src.local_pivot();
        let pivot = IntVector2::new(src.width() - 1 - lp.y, lp.x);
        self.quarter_turn(src, pivot)
    }

    /// [`rotate90_once`](Self::rotate90_once) with the pivot carried along
    /// with the pixel under it
    pub fn rotate90_pinned(&mut self, src: &Sprite<P>) -> Result<Sprite<P>> {
        let lp = src.local_pivot();
        let pivot = IntVector2::new(src.height() - 1 - lp.y, lp.x);
        self.quarter_turn(src, pivot)
    }

    fn quarter_turn(&mut self, src: &Sprite<P>, pivot: IntVector2) -> Result<Sprite<P>> {
        let (w, h) = (src.width(), src.height());
        let dest = self.get_sprite(h, w, pivot)?;

        let pixels = src.to_vec();
        let origin = dest.rect().min();
        {
            let mut buf = dest.buffer().borrow_mut();
            for sy in 0..h {
                for sx in 0..w {
                    let p = pixels[(sy * w + sx) as usize];
                    buf.set_pixel(origin.x + h - 1 - sy, origin.y + sx, p);
                }
            }
        }
        Ok(dest)
    }

    /// Rotate `turns` quarter turns clockwise; negative turns go
    /// counter-clockwise. Zero turns gives a plain copy.
    pub fn rotate_n(&mut self, src: &Sprite<P>, turns: i32) -> Result<Sprite<P>> {
        let turns = turns.rem_euclid(4);
        if turns == 0 {
            return self.copy(src);
        }

        let mut current = self.rotate90_once(src)?;
        for _ in 1..turns {
            let next = self.rotate90_once(&current)?;
            self.free_sprite(current)?;
            current = next;
        }
        Ok(current)
    }

    /// Horizontal shear: row `y` moves right by `round(amount * y)` (left
    /// for negative amounts). The sprite widens by `ceil(height * |amount|)`
    /// and the uncovered area is filled with `background`.
    pub fn shear_x(&mut self, src: &Sprite<P>, amount: f32, background: P) -> Result<Sprite<P>> {
        let (w, h) = (src.width(), src.height());
        let extra = shear_extent(amount, h);
        let lp = src.local_pivot();
        let pivot = IntVector2::new(lp.x + skew(amount, extra, lp.y), lp.y);

        let dest = self.get_sprite(w + extra, h, pivot)?;
        dest.clear(background);

        let pixels = src.to_vec();
        let origin = dest.rect().min();
        {
            let mut buf = dest.buffer().borrow_mut();
            for sy in 0..h {
                let shift = skew(amount, extra, sy);
                for sx in 0..w {
                    let p = pixels[(sy * w + sx) as usize];
                    buf.set_pixel(origin.x + sx + shift, origin.y + sy, p);
                }
            }
        }
        Ok(dest)
    }

    /// Vertical shear: column `x` moves down by `round(amount * x)`. The
    /// sprite grows by `ceil(width * |amount|)` rows.
    pub fn shear_y(&mut self, src: &Sprite<P>, amount: f32, background: P) -> Result<Sprite<P>> {
        let (w, h) = (src.width(), src.height());
        let extra = shear_extent(amount, w);
        let lp = src.local_pivot();
        let pivot = IntVector2::new(lp.x, lp.y + skew(amount, extra, lp.x));

        let dest = self.get_sprite(w, h + extra, pivot)?;
        dest.clear(background);

        let pixels = src.to_vec();
        let origin = dest.rect().min();
        {
            let mut buf = dest.buffer().borrow_mut();
            for sx in 0..w {
                let shift = skew(amount, extra, sx);
                for sy in 0..h {
                    let p = pixels[(sy * w + sx) as usize];
                    buf.set_pixel(origin.x + sx, origin.y + sy + shift, p);
                }
            }
        }
        Ok(dest)
    }

    /// Rotate clockwise by an arbitrary angle in degrees.
    ///
    /// The nearest multiple of 90 is done exactly with quarter turns; the
    /// remaining `[-45, 45]` degrees go through
    /// `shear_x(-tan(t/2)) -> shear_y(sin t) -> shear_x(-tan(t/2))`.
    /// Intermediate sprites are returned to the pool.
    pub fn rotate(&mut self, src: &Sprite<P>, degrees: f32, background: P) -> Result<Sprite<P>> {
        let turns = (degrees / 90.0).round();
        let residual = degrees - turns * 90.0;
        let base = self.rotate_n(src, turns as i32)?;
        if residual.abs() < 1e-4 {
            return Ok(base);
        }

        let theta = residual.to_radians();
        let along = -(theta / 2.0).tan();
        let across = theta.sin();

        let first = self.shear_x(&base, along, background)?;
        self.free_sprite(base)?;
        let second = self.shear_y(&first, across, background)?;
        self.free_sprite(first)?;
        let third = self.shear_x(&second, along, background)?;
        self.free_sprite(second)?;
        Ok(third)
    }
}
