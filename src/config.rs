//! Configuration for pagecoop
//!
//! Centralized configuration with sensible defaults.

use crate::error::{CoopError, Result};

/// Widest architecture byte the bit-vector layer supports
pub const MAX_BYTE_WIDTH: u32 = 64;

/// Main configuration shared by the cooperation protocols and the slot page
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Architecture Configuration
    // -------------------------------------------------------------------------
    /// Bits per addressable byte. Every value handled by composition and
    /// decomposition is `size * byte_width` bits wide.
    pub byte_width: u32,

    // -------------------------------------------------------------------------
    // Slot Page Configuration
    // -------------------------------------------------------------------------
    /// Size of the slot page window (in bytes)
    pub page_size: u64,

    /// Write granularity: bytes per chunk requested from a decomposer
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            byte_width: 8,
            page_size: 0x1000, // 4 KiB
            chunk_size: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if self.byte_width == 0 || self.byte_width > MAX_BYTE_WIDTH {
            return Err(CoopError::Config(format!(
                "byte_width must be in 1..={}, got {}",
                MAX_BYTE_WIDTH, self.byte_width
            )));
        }
        if self.page_size == 0 {
            return Err(CoopError::Config("page_size must be non-zero".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(CoopError::Config("chunk_size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the architecture byte width (in bits)
    pub fn byte_width(mut self, bits: u32) -> Self {
        self.config.byte_width = bits;
        self
    }

    /// Set the slot page size (in bytes)
    pub fn page_size(mut self, size: u64) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set the write granularity (in bytes)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Build the config
    pub fn build(self) -> Config {
        self.config
    }
}
