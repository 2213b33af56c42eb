use alloc::string::String;
use alloc::vec::Vec;

use rstest::rstest;

use crate::{Unit, Utf8Buf, Utf16Buf, Utf32Buf};

#[test]
fn inline_capacities_per_width() {
    assert_eq!(Utf8Buf::new().capacity(), 31);
    assert_eq!(Utf16Buf::new().capacity(), 15);
    assert_eq!(Utf32Buf::new().capacity(), 7);
}

#[test]
fn appends_within_the_inline_block_never_promote() {
    let mut buf = Utf16Buf::new();
    for i in 0..u16::INLINE_CAP {
        buf.push(u16::try_from(i).unwrap());
        assert!(!buf.is_large());
    }
    assert_eq!(buf.len(), u16::INLINE_CAP);
    assert_eq!(buf.capacity(), u16::INLINE_CAP);
}

#[test]
fn crossing_the_boundary_promotes_and_preserves() {
    let mut buf = Utf32Buf::new();
    let head: Vec<u32> = (1..=5).collect();
    buf.push_units(&head);
    assert!(!buf.is_large());

    let tail: Vec<u32> = (6..=20).collect();
    buf.push_units(&tail);
    assert!(buf.is_large());

    let expected: Vec<u32> = (1..=20).collect();
    assert_eq!(buf.code_units().collect::<Vec<_>>(), expected);
}

/// The same text must reach the same state no matter how it is partitioned
/// into append calls.
#[rstest]
#[case(1)]
#[case(3)]
#[case(7)]
#[case(26)]
fn chunked_appends_reach_the_same_state(#[case] chunk: usize) {
    let text = "test test test test test test test test test test";
    let whole = Utf8Buf::from(text);

    let mut pieces = Utf8Buf::new();
    let bytes = text.as_bytes();
    for piece in bytes.chunks(chunk) {
        pieces.push_units(piece);
    }
    assert_eq!(pieces, whole);
    assert!(pieces.is_large());
}

#[test]
fn growing_append_scenario() {
    let mut buf = Utf8Buf::new();
    let mut expected = String::new();

    buf.push_str("test");
    expected.push_str("test");
    assert!(!buf.is_large());

    for _ in 0..3 {
        buf.push_str(" test test test test test");
        expected.push_str(" test test test test test");
    }

    assert!(buf.is_large());
    assert_eq!(buf.len(), expected.len());
    assert_eq!(buf.code_units().as_slice(), expected.as_bytes());
}

#[test]
fn reserve_changes_capacity_not_length() {
    let mut buf = Utf16Buf::from("ab");
    buf.reserve(200);
    assert_eq!(buf.len(), 2);
    assert!(buf.capacity() >= 200);
    assert!(buf.is_large());

    // Already covered: a smaller request is a no-op.
    let cap = buf.capacity();
    buf.reserve(10);
    assert_eq!(buf.capacity(), cap);
}

#[test]
fn reserve_then_fill_does_not_reallocate() {
    let mut buf = Utf32Buf::new();
    buf.reserve(64);
    let cap = buf.capacity();
    for i in 0..64u32 {
        buf.push(i);
    }
    assert_eq!(buf.capacity(), cap);
    assert_eq!(buf.len(), 64);
}

#[test]
fn exact_size_sequences_reserve_in_one_step() {
    let mut buf = Utf8Buf::new();
    buf.extend_units(0..200u8);
    assert_eq!(buf.len(), 200);
    assert_eq!(buf.code_units().collect::<Vec<_>>(), (0..200u8).collect::<Vec<_>>());
}

#[test]
fn unknown_size_sequences_grow_in_chunks() {
    // Hide the length so the speculative-extension path is exercised.
    let units = (0..100u8).filter(|_| true);
    let mut buf = Utf8Buf::new();
    buf.extend_units(units);
    assert_eq!(buf.len(), 100);
    assert_eq!(buf.code_units().collect::<Vec<_>>(), (0..100u8).collect::<Vec<_>>());
}

#[test]
fn reset_returns_to_the_inline_layout() {
    let mut buf = Utf8Buf::from("a long enough text to be promoted to the heap");
    assert!(buf.is_large());
    let view = buf.code_units();

    buf.reset();
    assert!(!buf.is_large());
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), u8::INLINE_CAP);
    // The abandoned storage stays alive for the outstanding view.
    assert_eq!(
        view.as_slice(),
        b"a long enough text to be promoted to the heap"
    );
}

#[test]
fn assign_replaces_contents() {
    let mut buf = Utf16Buf::from("first contents, long enough to promote");
    buf.assign_str("second");
    assert_eq!(buf, Utf16Buf::from("second"));

    buf.assign_units(&[0x61, 0x62]);
    assert_eq!(buf, Utf16Buf::from("ab"));
}
