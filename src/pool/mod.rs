//! Buffer and sprite pool
//!
//! The pool is a manual loan system: `get_*` vends a buffer or sprite,
//! `free_*` hands it back for reuse. Spare buffers are kept in a first-fit
//! free list; a request reuses the first spare that is at least as large in
//! both dimensions, otherwise a new buffer is allocated (never smaller than
//! the configured minimum, to cut down on churn). Nothing is trimmed
//! proactively.
//!
//! Ownership is checked at runtime through the `Rc` count: a buffer that a
//! live sprite still views cannot be freed, and a buffer cannot be freed twice.
//!
//! The composite generators (shapes, lines, rotation, shear, sweeps) are in
//! the submodules and all vend their results from this pool.

mod raster;
mod sweep;
mod transform;

pub use raster::rasterize_circle;
pub use sweep::walk_line;

use std::rc::Rc;

use log::{debug, trace, warn};

use crate::blend::{self, BlendFn};
use crate::config::PoolConfig;
use crate::error::{RasterError, Result};
use crate::geometry::{IntRect, IntVector2};
use crate::pixel::Pixel;
use crate::pixel_buffer::PixelBuffer;
use crate::sprite::{share, SharedBuffer, Sprite};

/// Running counters, mostly for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub buffers_allocated: usize,
    pub buffers_reused: usize,
    pub buffers_freed: usize,
    /// Freed buffers dropped because the spare list was full
    pub buffers_dropped: usize,
    pub sprites_vended: usize,
    pub sprites_freed: usize,
}

/// Recycling allocator for pixel buffers and the sprites that view them
pub struct Pool<P> {
    config: PoolConfig,
    spare_buffers: Vec<SharedBuffer<P>>,
    mask: BlendFn<P>,
    transparent: P,
    stats: PoolStats,
}

impl<P: Pixel> Pool<P> {
    /// Pool with the default configuration and [`blend::mask`] as its mask
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
            spare_buffers: Vec::new(),
            mask: blend::mask::<P>,
            transparent: P::TRANSPARENT,
            stats: PoolStats::default(),
        }
    }

    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Replace the blend function generators use to stamp shapes
    pub fn with_mask(mut self, mask: BlendFn<P>) -> Self {
        self.mask = mask;
        self
    }

    /// Replace the background value generators clear to
    pub fn with_transparent(mut self, transparent: P) -> Self {
        self.transparent = transparent;
        self
    }

    #[inline]
    pub fn mask(&self) -> BlendFn<P> {
        self.mask
    }

    #[inline]
    pub fn transparent(&self) -> P {
        self.transparent
    }

    #[inline]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Number of buffers waiting for reuse
    #[inline]
    pub fn spare_buffer_count(&self) -> usize {
        self.spare_buffers.len()
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    /// Vend a buffer at least `width x height`. Contents are whatever the
    /// previous holder left behind.
    pub fn get_buffer(&mut self, width: i32, height: i32) -> Result<SharedBuffer<P>> {
        if width < 1 || height < 1 {
            return Err(RasterError::InvalidSize { width, height });
        }

        let fit = self.spare_buffers.iter().position(|b| {
            let b = b.borrow();
            b.width() >= width && b.height() >= height
        });
        if let Some(i) = fit {
            let buffer = self.spare_buffers.remove(i);
            self.stats.buffers_reused += 1;
            trace!(
                "pool: reusing {}x{} buffer for {}x{} request ({} spare left)",
                buffer.borrow().width(),
                buffer.borrow().height(),
                width,
                height,
                self.spare_buffers.len()
            );
            return Ok(buffer);
        }

        let alloc_w = width.max(self.config.min_buffer_width);
        let alloc_h = height.max(self.config.min_buffer_height);
        let buffer = PixelBuffer::filled(alloc_w, alloc_h, self.transparent)?;
        self.stats.buffers_allocated += 1;
        debug!(
            "pool: allocated {}x{} buffer for {}x{} request (total allocated: {})",
            alloc_w, alloc_h, width, height, self.stats.buffers_allocated
        );
        Ok(share(buffer))
    }

    /// Return a buffer for reuse.
    ///
    /// Fails if the buffer is already pooled or if anything else (a sprite,
    /// a cloned handle) still refers to it.
    pub fn free_buffer(&mut self, buffer: SharedBuffer<P>) -> Result<()> {
        if self.spare_buffers.iter().any(|b| Rc::ptr_eq(b, &buffer)) {
            warn!("pool: buffer freed twice");
            return Err(RasterError::DoubleFree);
        }
        let holders = Rc::strong_count(&buffer) - 1;
        if holders > 0 {
            warn!("pool: refusing to free buffer with {} live holder(s)", holders);
            return Err(RasterError::BufferInUse { holders });
        }

        self.stats.buffers_freed += 1;
        if let Some(cap) = self.config.max_spare_buffers {
            if self.spare_buffers.len() >= cap {
                self.stats.buffers_dropped += 1;
                debug!("pool: spare list full ({}), dropping freed buffer", cap);
                return Ok(());
            }
        }
        self.spare_buffers.push(buffer);
        Ok(())
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Vend a sprite with `rect = (0, 0, width, height)` in a pooled buffer
    pub fn get_sprite(&mut self, width: i32, height: i32, pivot: IntVector2) -> Result<Sprite<P>> {
        let buffer = self.get_buffer(width, height)?;
        let sprite = Sprite::new(buffer, IntRect::from_size(width, height), pivot)?;
        self.stats.sprites_vended += 1;
        trace!("pool: vended {}x{} sprite, pivot {:?}", width, height, pivot);
        Ok(sprite)
    }

    /// Release a sprite. Its buffer goes back to the pool unless another
    /// sprite still views it.
    pub fn free_sprite(&mut self, sprite: Sprite<P>) -> Result<()> {
        self.stats.sprites_freed += 1;
        let buffer = sprite.into_buffer();
        if Rc::strong_count(&buffer) > 1 {
            trace!("pool: freed sprite view, buffer still shared");
            return Ok(());
        }
        self.free_buffer(buffer)
    }

    /// Deep copy into pooled storage, same size and pivot
    pub fn copy(&mut self, src: &Sprite<P>) -> Result<Sprite<P>> {
        let copy = self.get_sprite(src.width(), src.height(), src.local_pivot())?;
        copy.blend_at_origin(src, blend::replace::<P>);
        Ok(copy)
    }
}

impl<P: Pixel> Default for Pool<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for Pool<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("config", &self.config)
            .field("spare_buffers", &self.spare_buffers.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
