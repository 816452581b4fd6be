use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{error::ErrorKind, Buffer, BUFFER_MAX_SIZE};

#[test]
fn appends_little_endian() {
    let mut buf = Buffer::new();
    buf.append_i32(1).unwrap();
    buf.append_i64(-2).unwrap();
    buf.append_u64(3).unwrap();
    buf.append_f64(1.0).unwrap();
    buf.append_u8(0xAB).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&1_i32.to_le_bytes());
    expected.extend_from_slice(&(-2_i64).to_le_bytes());
    expected.extend_from_slice(&3_u64.to_le_bytes());
    expected.extend_from_slice(&1.0_f64.to_le_bytes());
    expected.push(0xAB);
    assert_eq!(buf.as_bytes(), expected.as_slice());
    assert!(buf.len() <= buf.capacity());
}

#[test]
fn strings_are_length_prefixed() {
    let mut buf = Buffer::new();
    buf.append_string("hi").unwrap();
    buf.append_cstring("key").unwrap();
    assert_eq!(buf.as_bytes(), b"\x03\x00\x00\x00hi\x00key\x00");
}

#[test]
fn cstring_rejects_interior_nul() {
    let mut buf = Buffer::new();
    assert_matches!(
        buf.append_cstring("a\0b").unwrap_err().kind,
        ErrorKind::InvalidFieldName { .. }
    );
    assert!(buf.is_empty());
}

#[test]
fn write_at_patches_in_place() {
    let mut buf = Buffer::new();
    buf.append(&[0; 8]).unwrap();
    buf.write_i32_at(4, 0x0102_0304).unwrap();
    assert_eq!(buf.as_bytes(), &[0, 0, 0, 0, 4, 3, 2, 1]);
}

#[test]
fn write_at_requires_written_bytes() {
    let mut buf = Buffer::new();
    buf.append(&[0; 6]).unwrap();
    assert_matches!(
        buf.write_i32_at(3, 7).unwrap_err().kind,
        ErrorKind::OutOfBounds {
            offset: 3,
            len: 4,
            buffer_len: 6
        }
    );
    assert_eq!(buf.as_bytes(), &[0; 6]);
}

#[test]
fn ceiling_is_enforced() {
    let mut buf = Buffer::with_capacity(8).with_max_size(16);
    buf.append(&[1; 16]).unwrap();
    assert_matches!(
        buf.append_u8(0).unwrap_err().kind,
        ErrorKind::BufferOverflow {
            requested: 17,
            max: 16
        }
    );
    assert_eq!(buf.len(), 16);
    assert_eq!(Buffer::new().max_size(), BUFFER_MAX_SIZE);
}

#[test]
fn first_failure_poisons() {
    let mut buf = Buffer::new().with_max_size(4);
    buf.sticky(|b| b.append(&[1; 8]));
    buf.sticky(|b| b.append(&[2; 2]));

    assert!(buf.is_empty());
    assert_matches!(
        buf.check().unwrap_err().kind,
        ErrorKind::BufferOverflow { requested: 8, .. }
    );
}

#[test]
fn release_and_reclaim_keep_the_allocation() {
    let mut buf = Buffer::new();
    buf.append(b"abc").unwrap();
    let ptr = buf.as_ptr();

    let shared = buf.release();
    assert!(shared.is_unique());

    let other = shared.clone();
    assert_eq!(shared.ref_count(), 2);
    assert!(shared.ptr_eq(&other));

    // a second handle prevents reclaiming
    let shared = shared.try_into_buffer().unwrap_err();
    drop(other);

    let buf = shared.try_into_buffer().unwrap();
    assert_eq!(buf.as_ptr(), ptr);
    assert_eq!(buf.as_bytes(), b"abc");
}
