//! Tests for the sector allocator
//!
//! These tests verify:
//! - Used-mask construction (header sectors, entry ranges, clipping)
//! - First-fit free run search
//! - Append fallback when no run fits
//! - Results never overlap header or referenced sectors

use anvil_edit::region::{
    build_used_mask, find_free_run, Location, LocationTable, HEADER_SECTORS,
};
use anvil_edit::RegionError;

// =============================================================================
// Helper Functions
// =============================================================================

fn table_with(entries: &[(usize, u32, usize)]) -> LocationTable {
    let mut table = LocationTable::empty();
    for &(index, offset, count) in entries {
        table.set(index, Location::new(offset, count).unwrap());
    }
    table
}

fn overlaps(table: &LocationTable, offset: u32, need: usize) -> bool {
    let start = offset as usize;
    let end = start + need;
    table.occupied().any(|(_, loc)| {
        let s = loc.offset as usize;
        let e = s + loc.count as usize;
        start < e && s < end
    })
}

// =============================================================================
// Used Mask Tests
// =============================================================================

#[test]
fn test_mask_marks_header_sectors() {
    let used = build_used_mask(2, &LocationTable::empty());
    assert_eq!(used, vec![true, true]);
}

#[test]
fn test_mask_short_file_has_no_header_marks() {
    let used = build_used_mask(1, &LocationTable::empty());
    assert_eq!(used, vec![false]);
}

#[test]
fn test_mask_marks_entry_ranges() {
    let table = table_with(&[(0, 2, 1), (5, 4, 3)]);
    let used = build_used_mask(8, &table);
    assert_eq!(used, vec![true, true, true, false, true, true, true, false]);
}

#[test]
fn test_mask_clips_entries_past_end_of_file() {
    let table = table_with(&[(0, 3, 10), (1, 50, 2)]);
    let used = build_used_mask(5, &table);
    assert_eq!(used, vec![true, true, false, true, true]);
}

#[test]
fn test_mask_ignores_zero_count_entries() {
    let mut table = LocationTable::empty();
    table.set(7, Location::from_bytes([0, 0, 3, 0]));
    let used = build_used_mask(4, &table);
    assert_eq!(used, vec![true, true, false, false]);
}

// =============================================================================
// Free Run Tests
// =============================================================================

#[test]
fn test_find_first_gap() {
    let table = table_with(&[(0, 2, 1), (1, 4, 1)]);
    let used = build_used_mask(5, &table);
    assert_eq!(find_free_run(&used, 1).unwrap(), 3);
}

#[test]
fn test_gap_too_small_is_skipped() {
    // free: 3, 6..8
    let table = table_with(&[(0, 2, 1), (1, 4, 2), (2, 8, 1)]);
    let used = build_used_mask(9, &table);
    assert_eq!(find_free_run(&used, 2).unwrap(), 6);
}

#[test]
fn test_no_fit_appends_at_end_of_file() {
    let table = table_with(&[(0, 2, 1), (1, 4, 1)]);
    let used = build_used_mask(5, &table);
    assert_eq!(find_free_run(&used, 2).unwrap(), 5);
}

#[test]
fn test_trailing_short_run_does_not_extend() {
    // Sector 4 is free but a 2-sector run would cross end of file: append instead
    let table = table_with(&[(0, 2, 2)]);
    let used = build_used_mask(5, &table);
    assert_eq!(find_free_run(&used, 2).unwrap(), 5);
}

#[test]
fn test_empty_region_appends_after_header() {
    let used = build_used_mask(2, &LocationTable::empty());
    assert_eq!(find_free_run(&used, 3).unwrap(), 2);
}

#[test]
fn test_zero_need_rejected() {
    let used = build_used_mask(4, &LocationTable::empty());
    assert!(matches!(
        find_free_run(&used, 0),
        Err(RegionError::InvalidArgument(_))
    ));
}

#[test]
fn test_result_never_overlaps_references() {
    let table = table_with(&[(0, 2, 3), (1, 6, 1), (2, 9, 4), (3, 14, 2), (4, 17, 1)]);
    let used = build_used_mask(20, &table);

    for need in 1..=6 {
        let offset = find_free_run(&used, need).unwrap();
        assert!(offset >= HEADER_SECTORS, "need={} offset={}", need, offset);
        assert!(!overlaps(&table, offset, need), "need={} offset={}", need, offset);
    }
}
