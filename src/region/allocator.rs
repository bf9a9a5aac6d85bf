//! Sector Allocator
//!
//! First-fit allocation over a used/free bitmap rebuilt from the location
//! table on every decision. Nothing is persisted: a sector is free exactly
//! when no location entry references it, so superseded reservations are
//! reclaimed implicitly. The rescan is O(1024) per write.

use crate::error::{RegionError, Result};

use super::{LocationTable, HEADER_SECTORS, SECTOR_SIZE};

/// Number of sectors spanned by a file of `file_size` bytes (rounded up)
pub fn sector_count_of(file_size: u64) -> u64 {
    file_size.div_ceil(SECTOR_SIZE as u64)
}

/// Build the used-sector bitmap for a file of `sector_count` sectors
///
/// Header sectors are always used (when present). Entry ranges reaching
/// past the end of the file are clipped to it.
pub fn build_used_mask(sector_count: u64, table: &LocationTable) -> Vec<bool> {
    let len = sector_count as usize;
    let mut used = vec![false; len];

    if len >= HEADER_SECTORS as usize {
        used[0] = true;
        used[1] = true;
    }

    for (_, loc) in table.occupied() {
        let start = (loc.offset as usize).min(len);
        let end = (loc.offset as usize + loc.count as usize).min(len);
        for slot in &mut used[start..end] {
            *slot = true;
        }
    }

    used
}

/// Find the first run of `need` free sectors at or after sector 2
///
/// Falls back to the end of the file (append) when no run fits. The
/// returned offset is never inside the header.
pub fn find_free_run(used: &[bool], need: usize) -> Result<u32> {
    if need == 0 {
        return Err(RegionError::InvalidArgument(
            "cannot allocate zero sectors".to_string(),
        ));
    }

    let mut run_start = 0usize;
    let mut run_len = 0usize;

    for (i, &is_used) in used.iter().enumerate().skip(HEADER_SECTORS as usize) {
        if is_used {
            run_len = 0;
            continue;
        }
        if run_len == 0 {
            run_start = i;
        }
        run_len += 1;
        if run_len >= need {
            return Ok(run_start as u32);
        }
    }

    Ok((used.len() as u32).max(HEADER_SECTORS))
}
