//! SlotPage Tests
//!
//! Tests verify:
//! - Store/read round trips at different write granularities
//! - Overwrites splitting and trimming existing slots
//! - Zero fill through the page
//! - Range checks and never-written bytes
//! - Handle lifetime follows slot lifetime
//! - Concurrent readers

use std::sync::Arc;
use std::thread;

use pagecoop::{
    BitVector, Config, CoopError, Endness, ObjectCooperation, Provenance, SlotPage, WriteSpec,
};

// =============================================================================
// Helpers
// =============================================================================

fn page_with(chunk_size: usize, byte_width: u32) -> SlotPage<ObjectCooperation> {
    let config = Config::builder()
        .page_size(0x1000)
        .chunk_size(chunk_size)
        .byte_width(byte_width)
        .build();
    let coop = ObjectCooperation::new(&config).unwrap();
    SlotPage::new(coop, 0x1000, &config).unwrap()
}

fn page(chunk_size: usize) -> SlotPage<ObjectCooperation> {
    page_with(chunk_size, 8)
}

fn bv(value: u128, size: usize) -> BitVector {
    BitVector::from_u128(value, size * 8)
}

fn read_u128(page: &SlotPage<ObjectCooperation>, addr: u64, size: usize, endness: Endness) -> u128 {
    page.read(addr, size, endness).unwrap().to_u128().unwrap()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_page_is_empty() {
    let page = page(1);
    assert!(page.is_empty());
    assert_eq!(page.slot_count(), 0);
    assert_eq!(page.segment_count(), 0);
    assert_eq!(page.base(), 0x1000);
    assert_eq!(page.size(), 0x1000);
}

#[test]
fn test_store_and_read_back() {
    let page = page(1);
    page.store(0x1000, bv(0x12345678, 4), 4, Endness::Big).unwrap();
    assert_eq!(read_u128(&page, 0x1000, 4, Endness::Big), 0x12345678);
    assert_eq!(read_u128(&page, 0x1000, 4, Endness::Little), 0x78563412);
}

#[test]
fn test_partial_read_independent_of_granularity() {
    for chunk_size in [1, 2, 3, 4, 8] {
        let page = page(chunk_size);
        page.store(0x1000, bv(0x12345678, 4), 4, Endness::Big).unwrap();

        assert_eq!(read_u128(&page, 0x1001, 2, Endness::Big), 0x3456);
        assert_eq!(page.segment_count(), 1);
        assert_eq!(page.slot_count(), (4 + chunk_size - 1) / chunk_size);
    }
}

#[test]
fn test_little_endian_store() {
    let page = page(2);
    page.store(0x1010, bv(0xAABBCCDD, 4), 4, Endness::Little).unwrap();

    assert_eq!(read_u128(&page, 0x1010, 4, Endness::Little), 0xAABBCCDD);
    assert_eq!(read_u128(&page, 0x1010, 1, Endness::Big), 0xDD);
    assert_eq!(read_u128(&page, 0x1013, 1, Endness::Big), 0xAA);
}

#[test]
fn test_read_across_writes() {
    let page = page(1);
    page.store(0x1000, bv(0x1122, 2), 2, Endness::Big).unwrap();
    page.store(0x1002, bv(0x3344, 2), 2, Endness::Big).unwrap();

    assert_eq!(read_u128(&page, 0x1001, 2, Endness::Big), 0x2233);
    assert_eq!(page.segment_count(), 2);
}

// =============================================================================
// Overwrite Tests
// =============================================================================

#[test]
fn test_overwrite_middle() {
    let page = page(8);
    page.store(0x1000, bv(0x1122334455667788, 8), 8, Endness::Big).unwrap();
    page.store(0x1002, bv(0xAAAA, 2), 2, Endness::Big).unwrap();

    assert_eq!(read_u128(&page, 0x1000, 8, Endness::Big), 0x1122AAAA55667788);
    assert_eq!(page.slot_count(), 3);
    assert_eq!(page.segment_count(), 3);
}

#[test]
fn test_overwrite_straddling_two_writes() {
    let page = page(1);
    page.store(0x1000, bv(0x11223344, 4), 4, Endness::Big).unwrap();
    page.store(0x1004, bv(0x55667788, 4), 4, Endness::Big).unwrap();
    page.store(0x1003, bv(0xEEFF, 2), 2, Endness::Big).unwrap();

    assert_eq!(read_u128(&page, 0x1000, 8, Endness::Big), 0x112233EEFF667788);
}

#[test]
fn test_overwrite_whole_write() {
    let page = page(4);
    page.store(0x1000, bv(0x11223344, 4), 4, Endness::Big).unwrap();
    page.store(0x1000, bv(0x55667788, 4), 4, Endness::Little).unwrap();

    assert_eq!(read_u128(&page, 0x1000, 4, Endness::Little), 0x55667788);
    assert_eq!(page.slot_count(), 1);
}

#[test]
fn test_overwrite_releases_shadowed_unit() {
    let page = page(1);
    page.store(0x1000, bv(0x1122, 2), 2, Endness::Big).unwrap();
    let old = page.load(0x1000, 1).unwrap().entries()[0].1.clone();
    assert_eq!(Arc::strong_count(&old), 3);

    page.store(0x1000, bv(0x3344, 2), 2, Endness::Big).unwrap();
    assert_eq!(Arc::strong_count(&old), 1);
}

// =============================================================================
// Zero Fill Tests
// =============================================================================

#[test]
fn test_store_zero() {
    let page = page(4);
    page.store_zero(0x1100, 16).unwrap();

    let value = page.read(0x1100, 16, Endness::Big).unwrap();
    assert_eq!(value.width(), 128);
    assert!(value.is_zero());
}

#[test]
fn test_zero_over_existing_data() {
    let page = page(1);
    page.store(0x1000, bv(0xFFFFFFFF, 4), 4, Endness::Big).unwrap();
    page.store_zero(0x1001, 2).unwrap();

    assert_eq!(read_u128(&page, 0x1000, 4, Endness::Big), 0xFF0000FF);
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_entries_follow_slots() {
    let page = page(2);
    page.store(0x1000, bv(0x11223344, 4), 4, Endness::Big).unwrap();

    let scan = page.load(0x1001, 3).unwrap();
    let addrs: Vec<u64> = scan.iter().map(|(a, _)| *a).collect();
    assert_eq!(addrs, vec![0x1001, 0x1002]);
    assert!(Arc::ptr_eq(&scan.entries()[0].1, &scan.entries()[1].1));
}

#[test]
fn test_load_carries_provenance() {
    let page = page(1);
    let spec = WriteSpec::new(0x1000, bv(0xAB, 1), 1, Endness::Big)
        .with_provenance(Provenance::new("mov [rsp], al"));
    page.store_spec(spec).unwrap();

    let scan = page.load(0x1000, 1).unwrap();
    let tag = scan.entries()[0].1.provenance().map(|p| p.as_str().to_string());
    assert_eq!(tag.as_deref(), Some("mov [rsp], al"));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_read_never_written() {
    let page = page(1);
    assert!(matches!(
        page.read(0x1000, 4, Endness::Big),
        Err(CoopError::MalformedInput(_))
    ));
}

#[test]
fn test_read_across_gap() {
    let page = page(1);
    page.store(0x1000, bv(0x11, 1), 1, Endness::Big).unwrap();
    page.store(0x1002, bv(0x33, 1), 1, Endness::Big).unwrap();

    assert!(matches!(page.load(0x1000, 3), Err(CoopError::MalformedInput(_))));
    assert!(page.load(0x1002, 1).is_ok());
}

#[test]
fn test_range_outside_page() {
    let page = page(1);
    assert!(page.store(0x0FFF, bv(0x1122, 2), 2, Endness::Big).is_err());
    assert!(page.store(0x1FFF, bv(0x1122, 2), 2, Endness::Big).is_err());
    assert!(page.store_zero(0x2000, 1).is_err());
    assert!(matches!(page.load(0x2000, 1), Err(CoopError::MalformedInput(_))));
    assert!(page.is_empty());
}

#[test]
fn test_last_byte_of_page() {
    let page = page(1);
    page.store(0x1FFF, bv(0x5A, 1), 1, Endness::Big).unwrap();
    assert_eq!(read_u128(&page, 0x1FFF, 1, Endness::Big), 0x5A);
}

#[test]
fn test_zero_sized_range() {
    let page = page(1);
    assert!(matches!(page.load(0x1000, 0), Err(CoopError::MalformedInput(_))));
}

#[test]
fn test_width_mismatch_leaves_page_untouched() {
    let page = page(1);
    page.store(0x1000, bv(0x11, 1), 1, Endness::Big).unwrap();

    let result = page.store(0x1000, bv(0x1122, 2), 4, Endness::Big);
    assert!(matches!(result, Err(CoopError::MalformedInput(_))));
    assert_eq!(read_u128(&page, 0x1000, 1, Endness::Big), 0x11);
}

#[test]
fn test_invalid_page_config() {
    let config = Config::builder().chunk_size(0).build();
    let result = SlotPage::new(ObjectCooperation::default(), 0, &config);
    assert!(matches!(result, Err(CoopError::Config(_))));

    let config = Config::default();
    let result = SlotPage::new(ObjectCooperation::default(), u64::MAX, &config);
    assert!(matches!(result, Err(CoopError::Config(_))));
}

// =============================================================================
// Byte Width Tests
// =============================================================================

#[test]
fn test_sixteen_bit_page() {
    let page = page_with(1, 16);
    page.store(0x1000, BitVector::from_u128(0x1111_2222_3333, 48), 3, Endness::Little)
        .unwrap();

    // Memory: 3333 2222 1111
    assert_eq!(read_u128(&page, 0x1000, 1, Endness::Big), 0x3333);
    assert_eq!(read_u128(&page, 0x1001, 2, Endness::Little), 0x1111_2222);
}

// =============================================================================
// Lifetime Tests
// =============================================================================

#[test]
fn test_clear_releases_units() {
    let page = page(1);
    page.store(0x1000, bv(0x11223344, 4), 4, Endness::Big).unwrap();
    let unit = page.load(0x1000, 1).unwrap().entries()[0].1.clone();
    assert_eq!(Arc::strong_count(&unit), 5);

    page.clear();
    assert!(page.is_empty());
    assert_eq!(Arc::strong_count(&unit), 1);
}

// =============================================================================
// Concurrent Access Tests (Basic)
// =============================================================================

#[test]
fn test_concurrent_reads() {
    let page = Arc::new(page(1));
    page.store(0x1000, bv(0x12345678, 4), 4, Endness::Big).unwrap();

    let mut handles = vec![];

    for _ in 0..8 {
        let p = Arc::clone(&page);
        let handle = thread::spawn(move || {
            for _ in 0..100 {
                let value = p.read(0x1001, 2, Endness::Big).unwrap();
                assert_eq!(value.to_u128(), Some(0x3456));
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_disjoint_writes() {
    let page = Arc::new(page(1));

    let mut handles = vec![];

    for i in 0..8u64 {
        let p = Arc::clone(&page);
        let handle = thread::spawn(move || {
            let addr = 0x1000 + i * 4;
            p.store(addr, bv(0x1000_0000 * (i as u128 + 1), 4), 4, Endness::Big)
                .unwrap();
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(page.slot_count(), 32);
    assert_eq!(page.segment_count(), 8);
    assert_eq!(read_u128(&page, 0x101C, 4, Endness::Big), 0x8000_0000);
}
