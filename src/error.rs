//! Error types for anvil-edit
//!
//! Provides a unified error type for all region, codec and editing operations.

use thiserror::Error;

/// Result type alias using RegionError
pub type Result<T> = std::result::Result<T, RegionError>;

/// Unified error type for anvil-edit operations
#[derive(Debug, Error)]
pub enum RegionError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Chunk ({x}, {z}) not present in region")]
    NotPresent { x: u32, z: u32 },

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Unsupported compression type {0}")]
    UnsupportedScheme(u8),

    #[error("Entry too large: {sectors} sectors")]
    EntryTooLarge { sectors: usize },

    #[error("Sector offset {offset} does not fit the 24-bit location field")]
    OffsetOutOfRange { offset: u32 },

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("NBT error: {0}")]
    Nbt(String),
}

impl From<serde_json::Error> for RegionError {
    fn from(e: serde_json::Error) -> Self {
        RegionError::Parse(e.to_string())
    }
}
