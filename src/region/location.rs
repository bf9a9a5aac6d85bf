//! Location and timestamp tables
//!
//! Parsed views over the two header sectors. Tables are never cached; each
//! operation re-reads them from disk.

use crate::error::{RegionError, Result};

use super::{MAX_SECTORS_PER_RECORD, MAX_SECTOR_OFFSET, SECTOR_SIZE, SLOT_COUNT};

/// One location table entry: where a record starts and how many sectors it reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Sector offset from the start of the file (0 = empty)
    pub offset: u32,
    /// Number of reserved sectors
    pub count: u8,
}

impl Location {
    pub fn new(offset: u32, count: usize) -> Result<Self> {
        if offset > MAX_SECTOR_OFFSET {
            return Err(RegionError::OffsetOutOfRange { offset });
        }
        if count > MAX_SECTORS_PER_RECORD {
            return Err(RegionError::EntryTooLarge { sectors: count });
        }
        Ok(Self {
            offset,
            count: count as u8,
        })
    }

    /// Unpack `[offset: u24 BE][count: u8]`
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        let offset = u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2]);
        Self {
            offset,
            count: bytes[3],
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [
            (self.offset >> 16) as u8,
            (self.offset >> 8) as u8,
            self.offset as u8,
            self.count,
        ]
    }

    /// An entry with a zero offset or zero count references no sectors
    pub fn is_empty(self) -> bool {
        self.offset == 0 || self.count == 0
    }

    /// Byte position of the record frame
    pub fn byte_offset(self) -> u64 {
        u64::from(self.offset) * SECTOR_SIZE as u64
    }

    /// Bytes reserved for the record frame
    pub fn reserved_bytes(self) -> usize {
        usize::from(self.count) * SECTOR_SIZE
    }
}

/// The 1024-entry location table (sector 0)
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: Vec<Location>,
}

impl LocationTable {
    /// Parse a 4096-byte location sector
    pub fn parse(sector: &[u8]) -> Result<Self> {
        if sector.len() < SECTOR_SIZE {
            return Err(RegionError::CorruptRecord(format!(
                "location table truncated: {} bytes",
                sector.len()
            )));
        }
        let entries = sector[..SECTOR_SIZE]
            .chunks_exact(4)
            .map(|c| Location::from_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: vec![Location::default(); SLOT_COUNT],
        }
    }

    pub fn get(&self, index: usize) -> Location {
        self.entries[index]
    }

    pub fn set(&mut self, index: usize, location: Location) {
        self.entries[index] = location;
    }

    /// Iterate over all entries that reference sectors
    pub fn occupied(&self) -> impl Iterator<Item = (usize, Location)> + '_ {
        self.entries
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, loc)| !loc.is_empty())
    }

    /// Serialize into a full 4096-byte sector
    pub fn to_sector(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SECTOR_SIZE);
        for loc in &self.entries {
            out.extend_from_slice(&loc.to_bytes());
        }
        out
    }
}

/// The 1024-entry timestamp table (sector 1); informational only
#[derive(Debug, Clone)]
pub struct TimestampTable {
    entries: Vec<u32>,
}

impl TimestampTable {
    pub fn parse(sector: &[u8]) -> Result<Self> {
        if sector.len() < SECTOR_SIZE {
            return Err(RegionError::CorruptRecord(format!(
                "timestamp table truncated: {} bytes",
                sector.len()
            )));
        }
        let entries = sector[..SECTOR_SIZE]
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, index: usize) -> u32 {
        self.entries[index]
    }

    pub fn set(&mut self, index: usize, epoch: u32) {
        self.entries[index] = epoch;
    }

    pub fn to_sector(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SECTOR_SIZE);
        for ts in &self.entries {
            out.extend_from_slice(&ts.to_be_bytes());
        }
        out
    }
}
