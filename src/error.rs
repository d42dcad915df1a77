//! Error type for recoverable raster failures.
//!
//! Contract violations (mismatched blend rectangles, out-of-bounds indexing)
//! are not represented here: they panic at the call site.

use thiserror::Error;

use crate::geometry::IntRect;

/// Errors returned by buffer, sprite and pool operations.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("invalid buffer size {width}x{height}: both dimensions must be positive")]
    InvalidSize { width: i32, height: i32 },
    #[error("degenerate rectangle {0:?}: width and height must be positive")]
    InvalidRect(IntRect),
    #[error("rectangle {rect:?} does not fit inside a {width}x{height} buffer")]
    RegionOutOfBounds {
        rect: IntRect,
        width: i32,
        height: i32,
    },
    #[error("pixel data has {actual} entries, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("stipple stride must be at least 1, got {0}")]
    InvalidStipple(i32),
    #[error("buffer is still referenced by {holders} other holder(s) and cannot be freed")]
    BufferInUse { holders: usize },
    #[error("buffer was already returned to the pool")]
    DoubleFree,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
