//! Wire frames for the device protocol.
//!
//! Every protocol unit travels as one checksummed frame:
//!
//! ```text
//! AA 55 | LEN(u16 BE) | ~LEN(u16 BE) | FRAME_ID(u8) | VERSION(u8)
//!       | PAYLOAD(LEN-8 bytes) | CHECKSUM(u16 BE)
//! ```
//!
//! `LEN` counts from the length field through the end of payload, so the
//! total on-wire size is `LEN + 2` and the checksum is the additive sum of
//! bytes `[2, LEN)`. The length complement and checksum together let the
//! extractor distinguish a real frame start from marker bytes occurring
//! inside corrupted payload.
//!
//! [`StreamFramer`] recovers complete frames from a fragmented, possibly
//! corrupted receive buffer; [`FrameWriter`] is the mirrored write half that
//! finalises header, length, and checksum for outbound replies.

use bytes::Bytes;

use crate::byte_order::read_network_u16;

pub mod extractor;
pub mod writer;

pub use extractor::{Extraction, StreamFramer};
pub use writer::{FrameWriter, write_ack};

/// Frame start marker bytes.
pub const MARKER: [u8; 2] = [0xAA, 0x55];

/// Fixed header size: marker, length, complement, frame id, version.
pub const HEADER_LEN: usize = 8;

/// Trailing checksum size.
pub const CHECKSUM_LEN: usize = 2;

/// Smallest complete frame: the fixed header plus checksum, empty payload.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + CHECKSUM_LEN;

/// Protocol revision selected by the frame's version byte.
///
/// Unknown version bytes still frame and parse structurally; they only lose
/// command-specific semantics beyond the shared header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Version byte `0x02`, protocol revision 2.05.
    V2_05,
    /// Version byte `0x05`, protocol revision 3.08.
    V3_08,
    /// Any other version byte; header-only semantics.
    Unknown(u8),
}

impl ProtocolVersion {
    /// Map a wire version byte to its protocol revision.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x02 => Self::V2_05,
            0x05 => Self::V3_08,
            other => Self::Unknown(other),
        }
    }

    /// The wire byte for this revision.
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Self::V2_05 => 0x02,
            Self::V3_08 => 0x05,
            Self::Unknown(byte) => byte,
        }
    }

    /// Human-readable revision string for logs.
    #[must_use]
    pub fn revision(self) -> &'static str {
        match self {
            Self::V2_05 => "2.05",
            Self::V3_08 => "3.08",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// One complete, checksum-validated frame.
///
/// Created by [`StreamFramer`] from a slice of the connection's receive
/// buffer and never mutated afterwards. The backing [`Bytes`] is an
/// independent handle, so a frame outlives the buffer it was cut from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap bytes the extractor has already validated.
    pub(crate) fn new_unchecked(bytes: Bytes) -> Self { Self { bytes } }

    /// Validate `bytes` as one exact frame and wrap them.
    ///
    /// Checks marker, length complement, total size, and checksum. Useful
    /// for replaying captured frames; live streams go through
    /// [`StreamFramer`] instead.
    #[must_use]
    pub fn from_wire(bytes: Bytes) -> Option<Self> {
        if bytes.len() < MIN_FRAME_LEN || bytes[..2] != MARKER {
            return None;
        }
        let len_field = read_network_u16([bytes[2], bytes[3]]);
        let complement = read_network_u16([bytes[4], bytes[5]]);
        if complement != !len_field {
            return None;
        }
        let len = usize::from(len_field);
        if len < HEADER_LEN || bytes.len() != len + CHECKSUM_LEN {
            return None;
        }
        let expected = read_network_u16([bytes[len], bytes[len + 1]]);
        crate::checksum::verify(&bytes[2..len], expected).then(|| Self::new_unchecked(bytes))
    }

    /// Total on-wire size in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Whether the frame is empty; always false for a validated frame.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// Frame identifier echoed back in replies.
    #[must_use]
    pub fn frame_id(&self) -> u8 { self.bytes[6] }

    /// Raw version byte.
    #[must_use]
    pub fn version_byte(&self) -> u8 { self.bytes[7] }

    /// Protocol revision decoded from the version byte.
    #[must_use]
    pub fn version(&self) -> ProtocolVersion { ProtocolVersion::from_byte(self.version_byte()) }

    /// Payload bytes between the header and the checksum.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.bytes[HEADER_LEN..self.bytes.len() - CHECKSUM_LEN] }

    /// Command identifier from the first two payload bytes, if present.
    #[must_use]
    pub fn command_id(&self) -> Option<u16> {
        let payload = self.payload();
        (payload.len() >= 2).then(|| read_network_u16([payload[0], payload[1]]))
    }

    /// Payload bytes after the command identifier.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        let payload = self.payload();
        payload.get(2..).unwrap_or_default()
    }

    /// The complete wire bytes, marker through checksum.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    /// Consume the frame, returning its wire bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes { self.bytes }
}

#[cfg(test)]
mod tests;
