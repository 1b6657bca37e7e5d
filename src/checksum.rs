//! Additive frame checksum.
//!
//! The device protocol checksums each frame with the sum of unsigned byte
//! values over the length field through the end of payload, truncated to
//! 16 bits. Overflow wraps; carries beyond bit 15 are discarded because only
//! the low 16 bits travel on the wire.

/// Sum the unsigned byte values of `bytes`, wrapping at 16 bits.
///
/// # Examples
///
/// ```
/// use obdwire::checksum::sum;
///
/// // Checksummed range of the 13-byte generic acknowledgement frame.
/// let range = [0x00, 0x0B, 0xFF, 0xF4, 0x00, 0x05, 0x16, 0x01, 0x00];
/// assert_eq!(sum(&range), 0x021A);
/// ```
#[must_use]
pub fn sum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b)))
}

/// Check whether the checksum of `bytes` equals `expected`.
#[must_use]
pub fn verify(bytes: &[u8], expected: u16) -> bool { sum(bytes) == expected }
