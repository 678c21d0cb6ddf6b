//! Directory chain integration tests.
//!
//! Tests verify:
//! - Multi-directory chains are walked in file order
//! - Cycles of any length are rejected
//! - Empty chains and empty directories are accepted

use std::io::Cursor;

use wsi_tiffdump::{TiffDump, TiffError};

use super::test_utils::{pyramid_tiff, ByteOrderType, TestEntry, TestTiff, TiffBuilder};

fn try_parse(tiff: &TestTiff) -> Result<TiffDump, TiffError> {
    TiffDump::from_reader(Cursor::new(tiff.bytes.clone()))
}

fn chain_of(len: usize, order: ByteOrderType, bigtiff: bool) -> TestTiff {
    let mut builder = if bigtiff {
        TiffBuilder::bigtiff(order)
    } else {
        TiffBuilder::classic(order)
    };
    for i in 0..len {
        builder = builder.directory(vec![TestEntry::long(256, &[i as u32])]);
    }
    builder.build()
}

// =============================================================================
// Chain Walking
// =============================================================================

#[test]
fn test_chain_order_and_offsets() {
    let tiff = chain_of(5, ByteOrderType::BigEndian, false);
    let dump = try_parse(&tiff).unwrap();

    assert_eq!(dump.directory_count(), 5);
    for (i, dir) in dump.directories().enumerate() {
        assert_eq!(dir.offset(), tiff.directory_offsets[i]);
        assert_eq!(dump.get_uint(i, 256, 0).unwrap(), i as u64);
    }
    assert_eq!(dump.directory(4).unwrap().next_offset(), 0);
    assert_eq!(
        dump.directory(0).unwrap().next_offset(),
        tiff.directory_offsets[1]
    );
}

#[test]
fn test_long_bigtiff_chain() {
    let tiff = chain_of(64, ByteOrderType::LittleEndian, true);
    let dump = try_parse(&tiff).unwrap();
    assert_eq!(dump.directory_count(), 64);
    assert_eq!(dump.get_uint(63, 256, 0).unwrap(), 63);
}

#[test]
fn test_out_of_range_directory_is_absent() {
    let dump = try_parse(&chain_of(2, ByteOrderType::LittleEndian, false)).unwrap();
    assert!(dump.directory(2).is_none());
    assert!(dump.get_item(2, 256).is_none());
    assert_eq!(dump.get_value_count(2, 256), 0);
    assert!(dump.get_uint(2, 256, 0).is_err());
}

#[test]
fn test_zero_first_offset_has_no_directories() {
    let mut tiff = chain_of(1, ByteOrderType::LittleEndian, false);
    tiff.set_first_offset(0);

    let dump = try_parse(&tiff).unwrap();
    assert_eq!(dump.directory_count(), 0);
}

#[test]
fn test_empty_directory() {
    let tiff = TiffBuilder::bigtiff(ByteOrderType::BigEndian)
        .directory(Vec::new())
        .directory(vec![TestEntry::short(256, &[1])])
        .build();
    let dump = try_parse(&tiff).unwrap();

    assert_eq!(dump.directory_count(), 2);
    assert!(dump.directory(0).unwrap().is_empty());
    assert_eq!(dump.get_uint(1, 256, 0).unwrap(), 1);
}

// =============================================================================
// Cycle Detection
// =============================================================================

#[test]
fn test_self_reference_is_bad_data() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        for bigtiff in [false, true] {
            let mut tiff = chain_of(1, order, bigtiff);
            let own = tiff.directory_offsets[0];
            tiff.set_next_offset(0, own);

            let err = try_parse(&tiff).unwrap_err();
            assert!(err.is_bad_data(), "{order:?} bigtiff={bigtiff}: {err}");
        }
    }
}

#[test]
fn test_longer_cycle_is_bad_data() {
    let mut tiff = chain_of(4, ByteOrderType::LittleEndian, false);
    let back = tiff.directory_offsets[1];
    tiff.set_next_offset(3, back);

    let err = try_parse(&tiff).unwrap_err();
    assert!(err.is_bad_data());
    assert!(err.to_string().contains("Loop"), "{err}");
}

#[test]
fn test_cycle_to_first_directory() {
    let mut tiff = pyramid_tiff(ByteOrderType::BigEndian, true);
    let first = tiff.directory_offsets[0];
    tiff.set_next_offset(2, first);

    assert!(try_parse(&tiff).unwrap_err().is_bad_data());
}

#[test]
fn test_separate_parses_do_not_share_state() {
    // Visited offsets belong to one parse; reparsing the same bytes succeeds
    let tiff = chain_of(3, ByteOrderType::LittleEndian, false);
    for _ in 0..3 {
        assert_eq!(try_parse(&tiff).unwrap().directory_count(), 3);
    }
}
