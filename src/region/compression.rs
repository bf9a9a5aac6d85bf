//! Compression schemes
//!
//! Scheme tags as stored in the fifth byte of every record frame.

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{RegionError, Result};

/// Compression scheme of a record payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionScheme {
    /// One gzip stream
    Gzip = 1,
    /// One zlib stream (always used for writing)
    Zlib = 2,
}

impl CompressionScheme {
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(Self::Gzip),
            2 => Ok(Self::Zlib),
            other => Err(RegionError::UnsupportedScheme(other)),
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decompress a complete payload
    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let result = match self {
            Self::Gzip => GzDecoder::new(data).read_to_end(&mut out),
            Self::Zlib => ZlibDecoder::new(data).read_to_end(&mut out),
        };
        result.map_err(|e| {
            RegionError::CorruptRecord(format!("{:?} payload failed to decompress: {}", self, e))
        })?;
        Ok(out)
    }
}

/// Zlib-compress a complete payload with the given level (0-9)
///
/// Records are only ever written as zlib; gzip is read-only.
pub fn compress_zlib(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
