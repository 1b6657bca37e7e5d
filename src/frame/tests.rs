//! Unit tests for frame parsing and stream extraction.

use bytes::{Bytes, BytesMut};
use rstest::rstest;
use tokio_util::codec::Decoder;

use super::*;
use crate::codec::put_u16;

/// Build a valid frame with the given command and body bytes.
fn build_frame(frame_id: u8, version: ProtocolVersion, command: u16, body: &[u8]) -> Bytes {
    let mut writer = FrameWriter::begin(frame_id, version);
    put_u16(writer.payload_mut(), command);
    writer.payload_mut().extend_from_slice(body);
    writer.finish()
}

/// The reference 13-byte generic acknowledgement frame.
fn ack_bytes() -> Vec<u8> {
    vec![
        0xAA, 0x55, 0x00, 0x0B, 0xFF, 0xF4, 0x00, 0x05, 0x16, 0x01, 0x00, 0x02, 0x1A,
    ]
}

#[rstest]
#[case::v2(0x02, ProtocolVersion::V2_05, "2.05")]
#[case::v3(0x05, ProtocolVersion::V3_08, "3.08")]
#[case::unknown(0x7F, ProtocolVersion::Unknown(0x7F), "unknown")]
fn version_byte_mapping(#[case] byte: u8, #[case] expected: ProtocolVersion, #[case] rev: &str) {
    let version = ProtocolVersion::from_byte(byte);
    assert_eq!(version, expected);
    assert_eq!(version.to_byte(), byte);
    assert_eq!(version.revision(), rev);
}

#[test]
fn frame_accessors_on_reference_ack() {
    let frame = Frame::from_wire(Bytes::from(ack_bytes())).expect("reference ack must parse");
    assert_eq!(frame.len(), 13);
    assert_eq!(frame.frame_id(), 0x00);
    assert_eq!(frame.version(), ProtocolVersion::V3_08);
    assert_eq!(frame.command_id(), Some(0x1601));
    assert_eq!(frame.payload(), [0x16, 0x01, 0x00]);
    assert_eq!(frame.body(), [0x00]);
}

#[rstest]
#[case::bad_marker(|b: &mut Vec<u8>| b[0] = 0xAB)]
#[case::bad_complement(|b: &mut Vec<u8>| b[4] = 0x00)]
#[case::bad_checksum(|b: &mut Vec<u8>| b[12] ^= 0xFF)]
#[case::truncated(|b: &mut Vec<u8>| { b.pop(); })]
#[case::trailing_byte(|b: &mut Vec<u8>| b.push(0x00))]
fn from_wire_rejects_invalid_frames(#[case] corrupt: fn(&mut Vec<u8>)) {
    let mut bytes = ack_bytes();
    corrupt(&mut bytes);
    assert!(Frame::from_wire(Bytes::from(bytes)).is_none());
}

#[test]
fn extracts_single_frame_and_empties_buffer() {
    let framer = StreamFramer::new();
    let mut buf = BytesMut::from(&ack_bytes()[..]);

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.discarded, 0);
    assert!(!extraction.overflowed);
    assert!(buf.is_empty());
}

#[test]
fn extracts_back_to_back_frames_in_order() {
    let framer = StreamFramer::new();
    let first = build_frame(1, ProtocolVersion::V3_08, 0x1603, b"one\0");
    let second = build_frame(2, ProtocolVersion::V2_05, 0x1601, b"two\0");
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&first);
    buf.extend_from_slice(&second);

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 2);
    assert_eq!(extraction.frames[0].frame_id(), 1);
    assert_eq!(extraction.frames[1].frame_id(), 2);
    assert!(buf.is_empty());
}

#[test]
fn resynchronises_past_garbage_prefix() {
    let framer = StreamFramer::new();
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0xAA, 0x13]);
    buf.extend_from_slice(&ack_bytes());

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.discarded, 7);
    assert!(buf.is_empty());
}

#[test]
fn false_marker_with_bad_complement_does_not_mask_real_frame() {
    // AA 55 with a wrong complement must be skipped one byte at a time so
    // the valid frame right behind it is still recovered.
    let framer = StreamFramer::new();
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0xAA, 0x55, 0x00, 0x0B, 0x12, 0x34, 0x00, 0x05, 0x01, 0x02]);
    buf.extend_from_slice(&ack_bytes());

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.frames[0].command_id(), Some(0x1601));
    assert!(buf.is_empty());
}

#[test]
fn checksum_mismatch_skips_one_byte_not_whole_frame() {
    let framer = StreamFramer::new();
    let mut corrupted = ack_bytes();
    corrupted[12] ^= 0xFF;
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&corrupted);
    buf.extend_from_slice(&ack_bytes());

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.discarded, 13);
    assert!(buf.is_empty());
}

#[test]
fn partial_frame_is_retained_until_completed() {
    let framer = StreamFramer::new();
    let frame = build_frame(7, ProtocolVersion::V3_08, 0x1603, b"split-me\0");
    let mut buf = BytesMut::new();

    buf.extend_from_slice(&frame[..5]);
    let extraction = framer.extract(&mut buf);
    assert!(extraction.frames.is_empty());
    assert_eq!(buf.len(), 5);

    buf.extend_from_slice(&frame[5..]);
    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.frames[0].as_bytes(), frame.as_ref());
    assert!(buf.is_empty());
}

#[test]
fn oversize_buffer_is_cleared_and_reported() {
    let framer = StreamFramer::with_max_buffered(128);
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&vec![0x55u8; 200]);

    let extraction = framer.extract(&mut buf);
    assert!(extraction.frames.is_empty());
    assert!(extraction.overflowed);
    assert_eq!(extraction.discarded, 200);
    assert!(buf.is_empty());
}

#[test]
fn length_below_header_size_is_treated_as_false_marker() {
    let framer = StreamFramer::new();
    // Marker plus LEN=3 with a matching complement, then a real frame.
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&[0xAA, 0x55, 0x00, 0x03, 0xFF, 0xFC, 0x00, 0x00, 0x00, 0x00]);
    buf.extend_from_slice(&ack_bytes());

    let extraction = framer.extract(&mut buf);
    assert_eq!(extraction.frames.len(), 1);
    assert!(buf.is_empty());
}

#[test]
fn reference_request_frame_extracts_exactly() {
    // 77-byte frame: LEN 0x004B, complement 0xFFB4, checksum 0x0FDA.
    let mut bytes = vec![0xAA, 0x55, 0x00, 0x4B, 0xFF, 0xB4, 0x00, 0x05, 0x16, 0x03];
    bytes.extend_from_slice(&[0xFF; 13]);
    bytes.push(0xCB);
    bytes.extend_from_slice(&[0x00; 51]);
    bytes.extend_from_slice(&[0x0F, 0xDA]);
    assert_eq!(bytes.len(), 77);

    let framer = StreamFramer::new();
    let mut buf = BytesMut::from(&bytes[..]);
    let extraction = framer.extract(&mut buf);

    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(extraction.frames[0].len(), 77);
    assert_eq!(extraction.frames[0].command_id(), Some(0x1603));
    assert!(buf.is_empty());
}

#[test]
fn decoder_yields_frames_one_at_a_time() {
    let mut framer = StreamFramer::new();
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&ack_bytes());
    buf.extend_from_slice(&ack_bytes());

    assert!(framer.decode(&mut buf).unwrap().is_some());
    assert!(framer.decode(&mut buf).unwrap().is_some());
    assert!(framer.decode(&mut buf).unwrap().is_none());
}

#[test]
fn decoder_clears_oversize_buffer_without_erroring() {
    let mut framer = StreamFramer::with_max_buffered(64);
    let mut buf = BytesMut::from(&vec![0u8; 100][..]);
    assert!(framer.decode(&mut buf).unwrap().is_none());
    assert!(buf.is_empty());
}

#[test]
fn extract_from_returns_retained_tail() {
    let frame = build_frame(3, ProtocolVersion::V2_05, 0x1601, b"x\0");
    let mut input = frame.to_vec();
    input.extend_from_slice(&frame[..4]);

    let (extraction, retained) = extractor::extract_from(&StreamFramer::new(), &input);
    assert_eq!(extraction.frames.len(), 1);
    assert_eq!(retained.as_ref(), &frame[..4]);
}
