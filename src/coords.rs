//! Coordinate Mapper
//!
//! Pure functions mapping world block coordinates to region files and
//! chunk slots.
//!
//! ```text
//! block (x, z) ──/16──▶ chunk (cx, cz) ──mod 32──▶ slot in region
//!      │
//!      └──────/512────▶ region (rx, rz) ──▶ r.<rx>.<rz>.<ext>
//! ```

use crate::error::{RegionError, Result};

/// Blocks along one edge of a chunk
pub const CHUNK_WIDTH: i32 = 16;

/// Chunks along one edge of a region
pub const REGION_WIDTH: i32 = 32;

/// Blocks along one edge of a region
pub const REGION_BLOCKS: i32 = CHUNK_WIDTH * REGION_WIDTH;

/// Division rounding toward negative infinity
pub fn floor_div(a: i32, b: i32) -> i32 {
    let q = a / b;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Remainder with the sign of the (positive) divisor
pub fn floor_mod(a: i32, b: i32) -> i32 {
    a.rem_euclid(b)
}

/// Region coordinates containing the given block
pub fn world_to_region(x: i32, z: i32) -> (i32, i32) {
    (floor_div(x, REGION_BLOCKS), floor_div(z, REGION_BLOCKS))
}

/// Absolute chunk coordinates containing the given block
pub fn world_to_chunk(x: i32, z: i32) -> (i32, i32) {
    (floor_div(x, CHUNK_WIDTH), floor_div(z, CHUNK_WIDTH))
}

/// Chunk position inside its region, each component in `0..32`
pub fn in_region_chunk(cx: i32, cz: i32) -> (u32, u32) {
    (
        floor_mod(cx, REGION_WIDTH) as u32,
        floor_mod(cz, REGION_WIDTH) as u32,
    )
}

/// Block position inside its chunk, each component in `0..16`
pub fn local_block(x: i32, z: i32) -> (i32, i32) {
    (floor_mod(x, CHUNK_WIDTH), floor_mod(z, CHUNK_WIDTH))
}

/// Region file name: `r.<rx>.<rz>.<ext>`
pub fn region_file_name(rx: i32, rz: i32, ext: &str) -> String {
    format!("r.{}.{}.{}", rx, rz, ext)
}

/// Row-major slot index (`cz * 32 + cx`) into the header tables
pub fn slot_index(cx: u32, cz: u32) -> Result<usize> {
    let width = REGION_WIDTH as u32;
    if cx >= width || cz >= width {
        return Err(RegionError::InvalidArgument(format!(
            "chunk ({}, {}) outside 32x32 region",
            cx, cz
        )));
    }
    Ok((cz * width + cx) as usize)
}
