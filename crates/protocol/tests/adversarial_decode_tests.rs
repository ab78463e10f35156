//! Pathological wire inputs for the message codec. A Roughtime message is a small,
//! self-describing container, so there are only so many ways to corrupt one; we try
//! anyway, hand-building the byte layouts `Message::encode` would never itself produce.

use roughtime_protocol::error::Error;
use roughtime_protocol::key::Key;
use roughtime_protocol::message::{Message, NestingContext};

#[test]
fn unaligned_total_length_is_rejected() {
    let buf = vec![0u8; 15];
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert_eq!(err, Error::Unaligned(15));
}

#[test]
fn header_longer_than_buffer_is_rejected() {
    // Claims 4 tags (header of 8*4 = 32 bytes) inside a 16-byte buffer.
    let mut buf = Vec::new();
    buf.extend_from_slice(&4u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 12]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::MalformedPacket(_)));
}

#[test]
fn offset_pointing_past_the_value_region_is_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&1_000_000u32.to_le_bytes()); // offset of 2nd value, wildly out of range
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&Key::SIG.wire_bytes());
    buf.extend_from_slice(&[0u8; 64]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::OffsetOutOfRange(_, _)));
}

#[test]
fn descending_offsets_are_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&3u32.to_le_bytes());
    buf.extend_from_slice(&64u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // goes backwards
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&Key::SIG.wire_bytes());
    buf.extend_from_slice(&Key::INDX.wire_bytes());
    buf.extend_from_slice(&[0u8; 64]);
    buf.extend_from_slice(&[0u8; 64]);
    buf.extend_from_slice(&[0u8; 4]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::UnorderedOffset(_, _)));
}

#[test]
fn tag_count_of_zero_decodes_to_an_empty_message() {
    let buf = 0u32.to_le_bytes().to_vec();
    let decoded = Message::decode(&buf, NestingContext::TopLevel).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn completely_unrecognized_key_bytes_are_unknown_tag() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(b"XYZQ");
    buf.extend_from_slice(&[0u8; 4]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert_eq!(err, Error::UnknownTag(*b"XYZQ"));
}

#[test]
fn known_key_wrong_nesting_level_is_also_unknown_tag() {
    // PUBK only lives inside a DELE; here it's offered at top level.
    let mut buf = Vec::new();
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&Key::PUBK.wire_bytes());
    buf.extend_from_slice(&[0u8; 32]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert_eq!(err, Error::UnknownTag(Key::PUBK.wire_bytes()));
}

#[test]
fn value_length_not_a_multiple_of_four_is_rejected() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&3u32.to_le_bytes()); // first value is 3 bytes, not 4-aligned
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&Key::SIG.wire_bytes());
    buf.extend_from_slice(&[0u8; 3]);
    buf.extend_from_slice(&[0u8; 64]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::BadValueLength(3)));
}

#[test]
fn ascii_key_order_is_not_wire_order() {
    // "CERT" precedes "NONC" in ASCII reading order (C < N), but ordering is defined over
    // the little-endian 32-bit interpretation, under which NONC sorts first. Writing them
    // in ASCII order must be rejected as unordered.
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&152u32.to_le_bytes());
    buf.extend_from_slice(&Key::CERT.wire_bytes());
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&[0u8; 152]);
    buf.extend_from_slice(&[0u8; 64]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::UnorderedTag(_, _)));
}

#[test]
fn same_key_twice_fails_the_strict_ordering_check() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&64u32.to_le_bytes());
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&Key::NONC.wire_bytes());
    buf.extend_from_slice(&[0u8; 64]);
    buf.extend_from_slice(&[0u8; 64]);
    let err = Message::decode(&buf, NestingContext::TopLevel).unwrap_err();
    assert!(matches!(err, Error::UnorderedTag(_, _)));
}
