//! brushwork: software 2D raster compositing
//!
//! Pixel buffers are flat row-major arrays; [`Sprite`]s are rectangle + pivot
//! views into them that can be brushed onto one another with any
//! [`BlendFn`]. A [`Pool`] recycles buffers and builds composite sprites:
//! discs, thick and stippled lines, quarter-turn and shear rotations.

pub mod blend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pixel;
pub mod pixel_buffer;
pub mod pool;
pub mod scene;
pub mod sprite;

pub use blend::{BlendFn, BlendMode, BlendTable};
pub use config::PoolConfig;
pub use error::{RasterError, Result};
pub use geometry::{IntRect, IntVector2};
pub use pixel::{Color, Pixel, PixelOps};
pub use pixel_buffer::PixelBuffer;
pub use pool::{rasterize_circle, walk_line, Pool, PoolStats};
pub use scene::{Scene, Stroke};
pub use sprite::{share, SharedBuffer, Sprite};
