//! Pool configuration, loadable from JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

pub const DEFAULT_MIN_BUFFER_SIZE: i32 = 256;

/// Tuning knobs for a [`Pool`](crate::Pool)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Newly allocated buffers are at least this wide
    pub min_buffer_width: i32,
    /// Newly allocated buffers are at least this tall
    pub min_buffer_height: i32,
    /// Cap on pooled spare buffers; extra frees are dropped. `None` = no cap.
    pub max_spare_buffers: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_buffer_width: DEFAULT_MIN_BUFFER_SIZE,
            min_buffer_height: DEFAULT_MIN_BUFFER_SIZE,
            max_spare_buffers: None,
        }
    }
}

impl PoolConfig {
    /// No minimum size: buffers are allocated at exactly the requested size
    pub fn exact() -> Self {
        Self {
            min_buffer_width: 1,
            min_buffer_height: 1,
            max_spare_buffers: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_buffer_width < 1 || self.min_buffer_height < 1 {
            return Err(RasterError::Config(format!(
                "minimum buffer size must be positive, got {}x{}",
                self.min_buffer_width, self.min_buffer_height
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RasterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| RasterError::Config(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}
