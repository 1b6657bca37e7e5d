//! Append-only payload writers.
//!
//! Writers never fail: a string over its protocol-defined maximum is
//! truncated and logged, never rejected, so reply construction always makes
//! forward progress.

use bytes::{BufMut, BytesMut};

use crate::byte_order::{write_network_i16, write_network_u16, write_network_u32};

/// Append one unsigned byte.
pub fn put_u8(dst: &mut BytesMut, value: u8) { dst.put_u8(value); }

/// Append a big-endian `u16`.
pub fn put_u16(dst: &mut BytesMut, value: u16) {
    dst.extend_from_slice(&write_network_u16(value));
}

/// Append a big-endian `u32`.
pub fn put_u32(dst: &mut BytesMut, value: u32) {
    dst.extend_from_slice(&write_network_u32(value));
}

/// Append a big-endian `i16` for fields documented as signed.
pub fn put_i16(dst: &mut BytesMut, value: i16) {
    dst.extend_from_slice(&write_network_i16(value));
}

/// Append a null-terminated string.
pub fn put_cstring(dst: &mut BytesMut, s: &str) {
    dst.extend_from_slice(s.as_bytes());
    dst.put_u8(0);
}

/// Append a null-terminated string, truncating to `max` content bytes.
///
/// Returns the original byte length when truncation occurred so the caller
/// can record a warning; the event is also logged here. Truncation lands on
/// a character boundary so the written bytes stay valid UTF-8.
pub fn put_cstring_bounded(
    dst: &mut BytesMut,
    s: &str,
    max: usize,
    field: &'static str,
) -> Option<usize> {
    if s.len() <= max {
        put_cstring(dst, s);
        return None;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    tracing::warn!(field, len = s.len(), max, "string field truncated to protocol maximum");
    put_cstring(dst, &s[..cut]);
    Some(s.len())
}
