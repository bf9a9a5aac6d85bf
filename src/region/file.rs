//! Region Container Engine
//!
//! Indexed read/write of single records over one open region file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::config::Config;
use crate::coords;
use crate::error::{RegionError, Result};
use crate::nbt::{self, Compound};

use super::{
    build_used_mask, compress_zlib, encode_frame, find_free_run, parse_header, sector_count_of,
    CompressionScheme, Location, LocationTable, TimestampTable, FRAME_HEADER_SIZE,
    HEADER_SECTORS, MAX_SECTORS_PER_RECORD, SECTOR_SIZE,
};

/// An open region file
///
/// ## Concurrency:
/// - `file`: Protected by Mutex. Every operation holds it for its whole
///   read → allocate → write sequence, so at most one table mutation is in
///   flight per handle.
/// - Nothing is cached between calls; tables are re-read from disk each time.
/// - Other processes writing the same file are not coordinated with.
pub struct RegionFile {
    /// Path the file was opened from
    path: PathBuf,

    /// Exclusively owned file handle
    file: Mutex<File>,

    /// Zlib level for new records
    compression_level: u32,

    /// fsync on close
    sync_on_close: bool,
}

impl RegionFile {
    /// Open an existing region file for reading and writing
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &Config::default())
    }

    /// Open an existing region file using the write settings from `config`
    pub fn open_with(path: &Path, config: &Config) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        tracing::debug!(path = %path.display(), "opened region file");
        Ok(Self::from_file(path, file, config))
    }

    /// Create a new, empty region file (two zeroed header sectors)
    ///
    /// Fails if the file already exists.
    pub fn create(path: &Path, config: &Config) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(&vec![0u8; HEADER_SECTORS as usize * SECTOR_SIZE])?;
        tracing::debug!(path = %path.display(), "created region file");
        Ok(Self::from_file(path, file, config))
    }

    /// Open the region file containing world block `(x, z)`
    ///
    /// The file name is derived from the region coordinates and looked up
    /// in `config.region_dir`. Returns the handle and the resolved path.
    pub fn open_for_world(config: &Config, x: i32, z: i32) -> Result<(Self, PathBuf)> {
        let (rx, rz) = coords::world_to_region(x, z);
        let name = coords::region_file_name(rx, rz, &config.file_extension);
        let path = config.region_dir.join(name);
        let region = Self::open_with(&path, config)?;
        Ok((region, path))
    }

    fn from_file(path: &Path, file: File, config: &Config) -> Self {
        Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            compression_level: config.compression_level,
            sync_on_close: config.sync_on_close,
        }
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Read and decompress the record at chunk slot `(cx, cz)`
    ///
    /// Returns `NotPresent` when the slot is empty.
    pub fn read_record(&self, cx: u32, cz: u32) -> Result<Vec<u8>> {
        let index = coords::slot_index(cx, cz)?;

        let (scheme, compressed) = {
            let mut file = self.file.lock();
            let table = read_location_table(&mut file)?;
            let loc = table.get(index);
            if loc.is_empty() {
                return Err(RegionError::NotPresent { x: cx, z: cz });
            }

            let mut header = [0u8; FRAME_HEADER_SIZE];
            file.seek(SeekFrom::Start(loc.byte_offset()))?;
            file.read_exact(&mut header)?;

            let (body_len, tag) = parse_header(&header, loc.reserved_bytes()).map_err(|e| {
                tracing::warn!(cx, cz, offset = loc.offset, count = loc.count, "corrupt record frame");
                e
            })?;

            let mut compressed = vec![0u8; body_len];
            file.read_exact(&mut compressed)?;
            tracing::trace!(cx, cz, offset = loc.offset, body_len, "read record frame");
            (tag, compressed)
        };

        CompressionScheme::from_tag(scheme)?.decompress(&compressed)
    }

    /// Compress and store `data` at chunk slot `(cx, cz)`
    ///
    /// Rewrites in place when the current reservation is large enough;
    /// otherwise takes the first free run (or appends). The payload is
    /// written before the tables, so a crash in between leaves the old
    /// record readable. Returns the location now recorded for the slot.
    pub fn write_record(&self, cx: u32, cz: u32, data: &[u8]) -> Result<Location> {
        let index = coords::slot_index(cx, cz)?;

        let compressed = compress_zlib(data, self.compression_level)?;
        let (mut frame, need) = encode_frame(CompressionScheme::Zlib, &compressed);
        if need > MAX_SECTORS_PER_RECORD {
            return Err(RegionError::EntryTooLarge { sectors: need });
        }

        let mut file = self.file.lock();
        let (mut locations, mut timestamps) = read_headers(&mut file)?;
        let old = locations.get(index);
        if !old.is_empty() && old.offset < HEADER_SECTORS {
            tracing::warn!(cx, cz, offset = old.offset, count = old.count, "location entry overlaps header sectors");
        }

        // Header sectors are never reused, even if a stale entry points there
        let target = if !old.is_empty() && old.offset >= HEADER_SECTORS && usize::from(old.count) >= need {
            tracing::debug!(cx, cz, offset = old.offset, count = old.count, need, "rewriting record in place");
            old
        } else {
            let file_sectors = sector_count_of(file.metadata()?.len());
            let used = build_used_mask(file_sectors, &locations);
            let offset = find_free_run(&used, need)?;
            let appended = u64::from(offset) >= file_sectors;
            tracing::debug!(cx, cz, offset, need, file_sectors, appended, "allocated sectors for record");
            Location::new(offset, need)?
        };

        frame.resize(target.reserved_bytes(), 0);
        file.seek(SeekFrom::Start(target.byte_offset()))?;
        file.write_all(&frame)?;

        locations.set(index, target);
        timestamps.set(index, now_epoch());
        write_headers(&mut file, &locations, &timestamps)?;

        Ok(target)
    }

    /// Read the record at `(cx, cz)` and decode it as a tag tree
    pub fn read_value(&self, cx: u32, cz: u32) -> Result<Compound> {
        let raw = self.read_record(cx, cz)?;
        let (_, compound) = nbt::decode(&raw)?;
        Ok(compound)
    }

    /// Encode `value` as a tag tree and store it at `(cx, cz)`
    pub fn write_value(&self, cx: u32, cz: u32, value: &Compound) -> Result<Location> {
        let raw = nbt::encode("", value)?;
        self.write_record(cx, cz, &raw)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Current location entry of a slot
    pub fn location(&self, cx: u32, cz: u32) -> Result<Location> {
        let index = coords::slot_index(cx, cz)?;
        let mut file = self.file.lock();
        Ok(read_location_table(&mut file)?.get(index))
    }

    /// Last-write epoch seconds recorded for a slot (0 if never written)
    pub fn timestamp(&self, cx: u32, cz: u32) -> Result<u32> {
        let index = coords::slot_index(cx, cz)?;
        let mut file = self.file.lock();
        let (_, timestamps) = read_headers(&mut file)?;
        Ok(timestamps.get(index))
    }

    /// Whether a slot holds a record
    pub fn contains(&self, cx: u32, cz: u32) -> Result<bool> {
        Ok(!self.location(cx, cz)?.is_empty())
    }

    /// File size in sectors (rounded up)
    pub fn sector_count(&self) -> Result<u64> {
        let file = self.file.lock();
        Ok(sector_count_of(file.metadata()?.len()))
    }

    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle
    pub fn close(self) -> Result<()> {
        let mut file = self.file.into_inner();
        file.flush()?;
        if self.sync_on_close {
            file.sync_all()?;
        }
        tracing::debug!(path = %self.path.display(), "closed region file");
        Ok(())
    }
}

// =============================================================================
// Header Helpers (called with the file lock held)
// =============================================================================

fn read_location_table(file: &mut File) -> Result<LocationTable> {
    let mut sector = vec![0u8; SECTOR_SIZE];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut sector)?;
    LocationTable::parse(&sector)
}

fn read_headers(file: &mut File) -> Result<(LocationTable, TimestampTable)> {
    let mut buf = vec![0u8; 2 * SECTOR_SIZE];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut buf)?;
    let (loc, ts) = buf.split_at(SECTOR_SIZE);
    Ok((LocationTable::parse(loc)?, TimestampTable::parse(ts)?))
}

/// Both tables go out in one write
fn write_headers(file: &mut File, locations: &LocationTable, timestamps: &TimestampTable) -> Result<()> {
    let mut buf = locations.to_sector();
    buf.extend_from_slice(&timestamps.to_sector());
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&buf)?;
    Ok(())
}

fn now_epoch() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0)
}
