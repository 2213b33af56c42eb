use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::{EncodingError, Utf8Buf, Utf16Buf, Utf32Buf};

#[test]
fn push_char_encodes_at_every_width() {
    let mut narrow = Utf8Buf::new();
    narrow.push_char('👍');
    assert_eq!(narrow.code_units().as_slice(), "👍".as_bytes());

    let mut wide = Utf16Buf::new();
    wide.push_char('👍');
    assert_eq!(
        wide.code_units().collect::<Vec<_>>(),
        "👍".encode_utf16().collect::<Vec<_>>()
    );

    let mut quad = Utf32Buf::new();
    quad.push_char('👍');
    assert_eq!(quad.code_units().collect::<Vec<_>>(), [0x1F44D]);
}

#[test]
fn native_width_appends_are_verbatim() {
    // The native-width path stores the unit as given, valid or not.
    let mut buf = Utf8Buf::new();
    buf.try_push(0xFFu8).unwrap();
    assert_eq!(buf.code_units().as_slice(), &[0xFF]);
}

#[test]
fn foreign_scalar_units_transcode() {
    let mut narrow = Utf8Buf::new();
    narrow.try_push(0x00F8u16).unwrap();
    assert_eq!(narrow.code_units().as_slice(), "ø".as_bytes());

    let mut wide = Utf16Buf::new();
    wide.try_push(b'x').unwrap().try_push(0x1F44Du32).unwrap();
    let mut expected: Vec<u16> = "x".encode_utf16().collect();
    expected.extend("👍".encode_utf16());
    assert_eq!(wide.code_units().collect::<Vec<_>>(), expected);
}

#[test]
fn fragments_are_rejected_without_mutation() {
    let mut narrow = Utf8Buf::from("kept");

    // Half of a surrogate pair is not a character on its own.
    assert_eq!(
        narrow.try_push(0xD83Du16).unwrap_err(),
        EncodingError::UnpairedSurrogate { unit: 0xD83D }
    );
    // Neither is a lone non-ASCII byte going the other way.
    let mut wide = Utf16Buf::new();
    assert_eq!(
        wide.try_push(0xC3u8).unwrap_err(),
        EncodingError::InvalidUnit { value: 0xC3 }
    );
    assert_eq!(
        wide.try_push(0x0011_0000u32).unwrap_err(),
        EncodingError::InvalidUnit { value: 0x0011_0000 }
    );

    assert_eq!(narrow, Utf8Buf::from("kept"));
    assert!(wide.is_empty());
}

#[test]
fn try_extend_keeps_the_prefix_before_the_offending_element() {
    let mut buf = Utf8Buf::new();
    let err = buf
        .try_extend([0x61u16, 0x62, 0xD800, 0x63])
        .unwrap_err();
    assert_eq!(err, EncodingError::UnpairedSurrogate { unit: 0xD800 });
    assert_eq!(buf.code_units().as_slice(), b"ab");
}

#[test]
fn mixed_width_sequences_append_element_by_element() {
    let mut buf = Utf32Buf::new();
    buf.try_extend([b'a', b'b']).unwrap();
    buf.try_extend([0x00F8u16]).unwrap();
    assert_eq!(buf.code_units().collect::<Vec<_>>(), [0x61, 0x62, 0xF8]);
}

#[test]
fn appends_chain() {
    let mut buf = Utf8Buf::new();
    buf.push(b'a').push_str("bc").push_char('d').put(b'e');
    assert_eq!(buf.code_units().as_slice(), b"abcde");
}

#[test]
fn sink_writing_through_fmt() {
    let mut buf = Utf16Buf::new();
    write!(buf, "{}-{}", 40 + 2, "ø").unwrap();
    assert_eq!(
        buf.code_units().collect::<Vec<_>>(),
        "42-ø".encode_utf16().collect::<Vec<_>>()
    );
}

#[test]
fn construction_from_iterators() {
    let from_units: Utf8Buf = b"abc".iter().copied().collect();
    let from_chars: Utf8Buf = "abc".chars().collect();
    assert_eq!(from_units, from_chars);
    assert_eq!(from_units, Utf8Buf::from(&b"abc"[..]));
}

#[test]
fn equality_is_unit_wise_within_a_width() {
    assert_eq!(Utf8Buf::from("ab"), Utf8Buf::from_units(b"ab"));
    assert_ne!(Utf8Buf::from("ab"), Utf8Buf::from("ba"));

    // Representation does not take part in equality.
    let mut promoted = Utf8Buf::from("ab");
    promoted.reserve(100);
    assert!(promoted.is_large());
    assert_eq!(promoted, Utf8Buf::from("ab"));
}

#[test]
fn cloned_buffers_diverge_on_append() {
    let mut original = Utf8Buf::from("a text long enough to live on the heap");
    let mut copy = original.clone();

    original.push_str(" plus this");
    copy.push_str(" plus that");

    assert_eq!(
        original.code_units().as_slice(),
        b"a text long enough to live on the heap plus this"
    );
    assert_eq!(
        copy.code_units().as_slice(),
        b"a text long enough to live on the heap plus that"
    );
}
