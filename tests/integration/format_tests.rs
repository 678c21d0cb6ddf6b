//! Format-level integration tests.
//!
//! Tests verify:
//! - Little-endian and big-endian files decode to identical values
//! - Classic TIFF and BigTIFF produce the same directory contents
//! - Inline and out-of-line values are indistinguishable to callers
//! - Every field type is read through the right accessor family

use std::io::Cursor;

use wsi_tiffdump::{AccessError, FieldType, TiffDump};

use super::test_utils::{
    minimal_tiff, pyramid_tiff, ByteOrderType, TestEntry, TiffBuilder,
};

fn parse(bytes: &[u8]) -> TiffDump {
    TiffDump::from_reader(Cursor::new(bytes.to_vec())).unwrap()
}

// =============================================================================
// Byte Order Tests
// =============================================================================

#[test]
fn test_little_endian_minimal() {
    let tiff = minimal_tiff(ByteOrderType::LittleEndian);
    assert_eq!(&tiff.bytes[..2], b"II");

    let dump = parse(&tiff.bytes);
    assert_eq!(dump.directory_count(), 1);
    assert!(!dump.is_big_endian());
    assert!(!dump.is_bigtiff());
    assert_eq!(dump.get_uint(0, 256, 0).unwrap(), 1024);
    assert_eq!(dump.get_value_count(0, 256), 1);
}

#[test]
fn test_big_endian_minimal() {
    let tiff = minimal_tiff(ByteOrderType::BigEndian);
    assert_eq!(&tiff.bytes[..2], b"MM");

    let dump = parse(&tiff.bytes);
    assert!(dump.is_big_endian());
    assert_eq!(dump.get_uint(0, 256, 0).unwrap(), 1024);
}

#[test]
fn test_both_byte_orders_produce_equivalent_results() {
    let le = parse(&pyramid_tiff(ByteOrderType::LittleEndian, false).bytes);
    let be = parse(&pyramid_tiff(ByteOrderType::BigEndian, false).bytes);

    assert_eq!(le.directory_count(), be.directory_count());
    for dir in 0..le.directory_count() {
        let tags = le.directory(dir).unwrap().tags();
        assert_eq!(tags, be.directory(dir).unwrap().tags());
        for tag in tags {
            let a = le.get_item(dir, tag).unwrap();
            let b = be.get_item(dir, tag).unwrap();
            assert_eq!(a.field_type(), b.field_type(), "tag {tag}");
            assert_eq!(a.count(), b.count(), "tag {tag}");
            // Host-order normalization makes the stored bytes identical
            assert_eq!(a.raw_bytes(), b.raw_bytes(), "tag {tag}");
        }
    }
}

// =============================================================================
// BigTIFF Tests
// =============================================================================

#[test]
fn test_bigtiff_parsing() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let tiff = pyramid_tiff(order, true);
        let dump = parse(&tiff.bytes);

        assert!(dump.is_bigtiff());
        assert_eq!(dump.directory_count(), 3);
        assert_eq!(dump.get_uint(0, 256, 0).unwrap(), 46000);
        assert_eq!(
            dump.get_uints(0, 324).unwrap(),
            vec![0x1_0000_0000, 0x1_0000_1000, 0x1_0000_2000]
        );
        assert_eq!(dump.get_uint(2, 40012, 0).unwrap(), 0xDEAD_BEEF_0000);
    }
}

#[test]
fn test_bigtiff_matches_classic() {
    let classic = parse(&pyramid_tiff(ByteOrderType::LittleEndian, false).bytes);
    let big = parse(&pyramid_tiff(ByteOrderType::LittleEndian, true).bytes);

    for dir in 0..classic.directory_count() {
        for tag in classic.directory(dir).unwrap().tags() {
            assert_eq!(
                classic.get_item(dir, tag).unwrap().raw_bytes(),
                big.get_item(dir, tag).unwrap().raw_bytes(),
                "dir {dir} tag {tag}"
            );
        }
    }
}

#[test]
fn test_bigtiff_inline_long8() {
    // 8 bytes fit the BigTIFF value field but not the classic one
    let big = TiffBuilder::bigtiff(ByteOrderType::BigEndian)
        .directory(vec![TestEntry::long8(500, &[u64::MAX - 1])])
        .build();
    let classic = TiffBuilder::classic(ByteOrderType::BigEndian)
        .directory(vec![TestEntry::long8(500, &[u64::MAX - 1])])
        .build();

    assert_eq!(parse(&big.bytes).get_uint(0, 500, 0).unwrap(), u64::MAX - 1);
    assert_eq!(parse(&classic.bytes).get_uint(0, 500, 0).unwrap(), u64::MAX - 1);
}

// =============================================================================
// Inline vs Out-of-line
// =============================================================================

#[test]
fn test_long_ascii_out_of_line() {
    let text = "A".repeat(199);
    let tiff = TiffBuilder::classic(ByteOrderType::LittleEndian)
        .directory(vec![
            TestEntry::ascii(270, &text),
            TestEntry::short(277, &[3]),
        ])
        .build();
    let dump = parse(&tiff.bytes);

    assert_eq!(dump.get_value_count(0, 270), 200);
    let buffer = dump.get_buffer(0, 270).unwrap();
    assert_eq!(buffer.len(), 200);
    assert_eq!(&buffer[..199], text.as_bytes());
    assert_eq!(buffer[199], 0);

    // The entry after the out-of-line value is still read from the IFD
    assert_eq!(dump.get_uint(0, 277, 0).unwrap(), 3);
}

#[test]
fn test_inline_and_out_of_line_shorts() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let tiff = TiffBuilder::classic(order)
            .directory(vec![
                TestEntry::short(258, &[8, 8]),
                TestEntry::short(259, &[8, 8, 8]),
            ])
            .build();
        let dump = parse(&tiff.bytes);
        assert_eq!(dump.get_uints(0, 258).unwrap(), vec![8, 8]);
        assert_eq!(dump.get_uints(0, 259).unwrap(), vec![8, 8, 8]);
    }
}

#[test]
fn test_inline_ascii_exact_field_width() {
    // "abc\0" fills the 4-byte classic field exactly
    let tiff = TiffBuilder::classic(ByteOrderType::BigEndian)
        .directory(vec![TestEntry::ascii(305, "abc")])
        .build();
    let dump = parse(&tiff.bytes);
    assert_eq!(dump.get_buffer(0, 305).unwrap(), b"abc\0");
}

// =============================================================================
// Value Types
// =============================================================================

#[test]
fn test_signed_values() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let dump = parse(&pyramid_tiff(order, false).bytes);

        assert_eq!(dump.get_sints(1, 40001).unwrap(), vec![-128, -1, 0, 127]);
        assert_eq!(dump.get_sint(1, 40002, 0).unwrap(), -300);
        assert_eq!(dump.get_sints(1, 40003).unwrap(), vec![-70000, 70000]);
        assert_eq!(dump.get_sints(1, 40004).unwrap(), vec![i64::MIN, -1]);
    }
}

#[test]
fn test_float_values() {
    for order in [ByteOrderType::LittleEndian, ByteOrderType::BigEndian] {
        let dump = parse(&pyramid_tiff(order, true).bytes);

        assert_eq!(dump.get_floats(1, 40006).unwrap(), vec![0.5, -2.25]);
        assert_eq!(dump.get_float(1, 40007, 0).unwrap(), std::f64::consts::PI);
    }
}

#[test]
fn test_rational_values() {
    let dump = parse(&pyramid_tiff(ByteOrderType::BigEndian, false).bytes);

    assert_eq!(dump.get_value_count(0, 282), 1);
    assert_eq!(dump.get_float(0, 282, 0).unwrap(), 20000.0);
    assert!((dump.get_float(0, 283, 0).unwrap() - 1.0 / 3.0).abs() < 1e-12);

    // Two rationals occupy four 4-byte integers but count as two values
    assert_eq!(dump.get_value_count(1, 40005), 2);
    assert_eq!(dump.get_floats(1, 40005).unwrap(), vec![-0.25, -1.5]);
    assert!(matches!(
        dump.get_float(1, 40005, 2),
        Err(AccessError::IndexOutOfRange { count: 2, .. })
    ));
}

#[test]
fn test_rational_zero_denominator() {
    let tiff = TiffBuilder::classic(ByteOrderType::LittleEndian)
        .directory(vec![
            TestEntry::rational(282, &[(1, 0), (0, 0)]),
            TestEntry::srational(283, &[(-1, 0)]),
        ])
        .build();
    let dump = parse(&tiff.bytes);

    assert_eq!(dump.get_float(0, 282, 0).unwrap(), f64::INFINITY);
    assert!(dump.get_float(0, 282, 1).unwrap().is_nan());
    assert_eq!(dump.get_float(0, 283, 0).unwrap(), f64::NEG_INFINITY);
}

#[test]
fn test_offset_types_are_unsigned() {
    let dump = parse(&pyramid_tiff(ByteOrderType::LittleEndian, false).bytes);

    assert_eq!(dump.get_item(2, 40011).unwrap().field_type(), FieldType::Ifd);
    assert_eq!(dump.get_uint(2, 40011, 0).unwrap(), 8);
    assert_eq!(dump.get_uints(2, 40010).unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_undefined_and_ascii_buffers() {
    let dump = parse(&pyramid_tiff(ByteOrderType::BigEndian, true).bytes);

    let tables = dump.get_buffer(0, 347).unwrap();
    assert_eq!(&tables[..2], &[0xFF, 0xD8]);
    assert_eq!(&tables[tables.len() - 2..], &[0xFF, 0xD9]);

    let description = dump.get_buffer(0, 270).unwrap();
    assert!(description.starts_with(b"Aperio Image Library"));
    assert_eq!(description.last(), Some(&0));
    assert_eq!(dump.get_buffer(2, 40013).unwrap(), b"x\0");
}

#[test]
fn test_type_family_mismatches() {
    let dump = parse(&pyramid_tiff(ByteOrderType::LittleEndian, false).bytes);

    let mismatches = [
        dump.get_uint(0, 270, 0).err(),
        dump.get_sint(0, 256, 0).err(),
        dump.get_float(1, 40003, 0).err(),
        dump.get_uint(1, 40006, 0).err(),
        dump.get_buffer(0, 256).err(),
        dump.get_sint(0, 347, 0).err(),
    ];
    for err in mismatches {
        assert!(
            matches!(err, Some(AccessError::UnexpectedType { .. })),
            "expected type mismatch, got {err:?}"
        );
    }

    // The dump stays usable after failed lookups
    assert_eq!(dump.get_uint(0, 256, 0).unwrap(), 46000);
}

#[test]
fn test_duplicate_tag_keeps_last_entry() {
    let tiff = TiffBuilder::classic(ByteOrderType::LittleEndian)
        .directory(vec![
            TestEntry::short(256, &[100]),
            TestEntry::long(256, &[200]),
        ])
        .build();
    let dump = parse(&tiff.bytes);

    assert_eq!(dump.directory(0).unwrap().len(), 1);
    assert_eq!(dump.get_item(0, 256).unwrap().field_type(), FieldType::Long);
    assert_eq!(dump.get_uint(0, 256, 0).unwrap(), 200);
}

#[test]
fn test_unterminated_ascii_is_returned_as_stored() {
    let tiff = TiffBuilder::classic(ByteOrderType::BigEndian)
        .directory(vec![TestEntry::ascii_raw(270, b"no terminator here")])
        .build();
    let dump = parse(&tiff.bytes);

    assert_eq!(dump.get_value_count(0, 270), 18);
    assert_eq!(dump.get_buffer(0, 270).unwrap(), b"no terminator here");
}
