//! Record Frame
//!
//! ```text
//! ┌───────────────┬────────────┬──────────────────────┬─────────────┐
//! │ Length u32 BE │ Scheme u8  │ Compressed (Len - 1) │ Zero pad    │
//! └───────────────┴────────────┴──────────────────────┴─────────────┘
//! ```

use bytes::{Buf, BufMut};

use crate::error::{RegionError, Result};

use super::{CompressionScheme, SECTOR_SIZE};

/// Length (4) + scheme tag (1)
pub const FRAME_HEADER_SIZE: usize = 5;

/// Build a frame padded with zeros to a whole number of sectors
///
/// Returns the frame and the number of sectors it spans.
pub fn encode_frame(scheme: CompressionScheme, compressed: &[u8]) -> (Vec<u8>, usize) {
    let frame_len = FRAME_HEADER_SIZE + compressed.len();
    let sectors = frame_len.div_ceil(SECTOR_SIZE);

    let mut buf = Vec::with_capacity(sectors * SECTOR_SIZE);
    buf.put_u32(compressed.len() as u32 + 1);
    buf.put_u8(scheme.tag());
    buf.put_slice(compressed);
    buf.resize(sectors * SECTOR_SIZE, 0);

    (buf, sectors)
}

/// Parse a 5-byte frame header against the bytes reserved for it
///
/// Returns the number of compressed bytes that follow and the raw
/// scheme tag (validated by the caller).
pub fn parse_header(header: &[u8], reserved_bytes: usize) -> Result<(usize, u8)> {
    if header.len() < FRAME_HEADER_SIZE {
        return Err(RegionError::CorruptRecord(format!(
            "frame header truncated: {} bytes",
            header.len()
        )));
    }
    let mut buf = header;
    let length = buf.get_u32() as usize;
    let scheme = buf.get_u8();

    if length == 0 || length > reserved_bytes {
        return Err(RegionError::CorruptRecord(format!(
            "invalid chunk length {} for {} reserved bytes",
            length, reserved_bytes
        )));
    }

    Ok((length - 1, scheme))
}
