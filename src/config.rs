//! Configuration for anvil-edit
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for locating and writing region files
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Location Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the region files of one dimension
    /// Internal structure:
    ///   {region_dir}/
    ///     ├── r.0.0.mca
    ///     ├── r.-1.0.mca
    ///     └── ...
    pub region_dir: PathBuf,

    /// Extension of region file names (`r.<x>.<z>.<ext>`)
    pub file_extension: String,

    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// Zlib compression level used for new records (0-9)
    pub compression_level: u32,

    /// fsync the file when a region is closed
    pub sync_on_close: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_dir: PathBuf::from("./region"),
            file_extension: "mca".to_string(),
            compression_level: 6,
            sync_on_close: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the region directory
    pub fn region_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.region_dir = path.into();
        self
    }

    /// Set the region file extension (without the leading dot)
    pub fn file_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.file_extension = ext.into();
        self
    }

    /// Set the zlib compression level, clamped to 0-9
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level.min(9);
        self
    }

    /// Enable or disable fsync on close
    pub fn sync_on_close(mut self, sync: bool) -> Self {
        self.config.sync_on_close = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
