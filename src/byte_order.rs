//! Helpers for explicit network byte-order conversions.
//!
//! The device protocol is big-endian on the wire. These helpers keep Clippy
//! expectations scoped to the conversion points so protocol code can remain
//! explicit about wire endianness without repeating lint annotations.

/// Serialise a `u16` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use obdwire::byte_order::write_network_u16;
///
/// assert_eq!(write_network_u16(0xAA55), [0xAA, 0x55]);
/// ```
#[must_use]
pub fn write_network_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u16` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use obdwire::byte_order::read_network_u16;
///
/// assert_eq!(read_network_u16([0x16, 0x03]), 0x1603);
/// ```
#[must_use]
pub fn read_network_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u16::from_be_bytes(bytes)
}

/// Serialise a `u32` in network byte order (big-endian).
#[must_use]
pub fn write_network_u32(value: u32) -> [u8; 4] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u32` from its on-wire representation.
#[must_use]
pub fn read_network_u32(bytes: [u8; 4]) -> u32 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u32::from_be_bytes(bytes)
}

/// Serialise an `i16` in network byte order (big-endian).
///
/// Signedness is part of each field's contract; only fields documented as
/// signed (for example a temperature offset) use the `i16`/`i32` helpers.
#[must_use]
pub fn write_network_i16(value: i16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `i16` from its on-wire representation.
#[must_use]
pub fn read_network_i16(bytes: [u8; 2]) -> i16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    i16::from_be_bytes(bytes)
}

/// Parse a network-order `i32` from its on-wire representation.
#[must_use]
pub fn read_network_i32(bytes: [u8; 4]) -> i32 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    i32::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    //! Round-trip tests for network byte-order conversion helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::zero(0x0000)]
    #[case::marker(0xAA55)]
    #[case::max(0xFFFF)]
    fn u16_round_trip(#[case] value: u16) {
        assert_eq!(read_network_u16(write_network_u16(value)), value);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::trip_id(0x0012_3456)]
    #[case::max(u32::MAX)]
    fn u32_round_trip(#[case] value: u32) {
        assert_eq!(read_network_u32(write_network_u32(value)), value);
    }

    #[rstest]
    #[case::negative_offset(-40)]
    #[case::zero(0)]
    #[case::positive(125)]
    fn i16_round_trip(#[case] value: i16) {
        assert_eq!(read_network_i16(write_network_i16(value)), value);
    }

    #[test]
    fn i32_reads_sign_extended() {
        assert_eq!(read_network_i32([0xFF, 0xFF, 0xFF, 0xFE]), -2);
    }
}
