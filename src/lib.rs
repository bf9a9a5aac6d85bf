//! # anvil-edit
//!
//! A region container engine for Anvil-format world files with:
//! - First-fit sector allocation with in-place rewrites
//! - Location and timestamp header tables kept consistent with record data
//! - Gzip/zlib record framing
//! - Block entity editing on decoded chunk tag trees
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Coordinate Mapper (coords)                  │
//! │        block (x, z) → r.<rx>.<rz>.mca + chunk slot          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Region Container Engine (region)               │
//! │          read_record / write_record  (Mutex<File>)          │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │ Sector Allocator│               │  Frame + zlib    │
//!   │  (first fit)    │               │  compression     │
//!   └─────────────────┘               └────────┬─────────┘
//!                                              │
//!                                              ▼
//!                                     ┌──────────────────┐
//!                                     │  NBT codec (nbt) │
//!                                     └────────┬─────────┘
//!                                              │
//!                                              ▼
//!                                     ┌──────────────────┐
//!                                     │ Field Editor     │
//!                                     │ (editor)         │
//!                                     └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod coords;
pub mod region;
pub mod nbt;
pub mod editor;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RegionError, Result};
pub use config::Config;
pub use region::RegionFile;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of anvil-edit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
