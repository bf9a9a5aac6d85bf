//! Region Module
//!
//! Sector-based container holding up to 32×32 compressed chunk records.
//!
//! ## Responsibilities
//! - Read and update the location/timestamp header tables
//! - Allocate sectors first-fit, falling back to file growth
//! - Frame, compress and decompress records
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Sector 0: Location Table (1024 × 4 bytes)              │
//! │   [Offset: u24 BE][Count: u8]   index = z*32 + x       │
//! ├────────────────────────────────────────────────────────┤
//! │ Sector 1: Timestamp Table (1024 × 4 bytes)             │
//! │   [Epoch seconds: u32 BE]                              │
//! ├────────────────────────────────────────────────────────┤
//! │ Sector 2..: Record Frames, each sector-aligned         │
//! │   [Length: u32 BE][Scheme: u8][Compressed][Zero pad]   │
//! │   (Length counts the scheme byte + compressed bytes)   │
//! └────────────────────────────────────────────────────────┘
//! ```

mod allocator;
mod compression;
mod file;
mod frame;
mod location;

pub use allocator::{build_used_mask, find_free_run, sector_count_of};
pub use compression::{compress_zlib, CompressionScheme};
pub use file::RegionFile;
pub use frame::{encode_frame, parse_header, FRAME_HEADER_SIZE};
pub use location::{Location, LocationTable, TimestampTable};

// =============================================================================
// Shared Constants
// =============================================================================

/// Size of one allocation unit in bytes
pub const SECTOR_SIZE: usize = 4096;

/// Sectors reserved for the location and timestamp tables
pub const HEADER_SECTORS: u32 = 2;

/// Number of record slots (32 × 32)
pub const SLOT_COUNT: usize = 1024;

/// Largest sector count a location entry can hold
pub const MAX_SECTORS_PER_RECORD: usize = u8::MAX as usize;

/// Largest sector offset a location entry can hold (24 bits)
pub const MAX_SECTOR_OFFSET: u32 = 0x00FF_FFFF;
