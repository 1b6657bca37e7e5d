//! Outbound frame construction.
//!
//! Replies are built in three phases: reserve the fixed header with a
//! placeholder length, append payload, then backpatch length and complement
//! and append the checksum over the exact range the inbound validator
//! checks (`[2, LEN)`). Using the one range in both directions is the
//! authoritative interoperability choice.

use bytes::{Bytes, BytesMut};

use crate::byte_order::write_network_u16;
use crate::checksum;
use crate::codec::{put_u8, put_u16};

use super::{MARKER, ProtocolVersion};

/// Incremental writer for one outbound frame.
#[derive(Debug)]
pub struct FrameWriter {
    buf: BytesMut,
}

impl FrameWriter {
    /// Start a frame, reserving header space with a placeholder length.
    #[must_use]
    pub fn begin(frame_id: u8, version: ProtocolVersion) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.extend_from_slice(&MARKER);
        buf.extend_from_slice(&[0, 0, 0, 0]);
        put_u8(&mut buf, frame_id);
        put_u8(&mut buf, version.to_byte());
        Self { buf }
    }

    /// The payload buffer; sections are appended here in protocol order.
    pub fn payload_mut(&mut self) -> &mut BytesMut { &mut self.buf }

    /// Backpatch length and complement, append the checksum, and return the
    /// finished wire bytes.
    pub fn finish(mut self) -> Bytes {
        let len = match u16::try_from(self.buf.len()) {
            Ok(len) => len,
            Err(_) => {
                // The length field cannot represent the payload; a reply
                // this large only arises from a caller bug, so clamp rather
                // than lose the whole frame.
                tracing::error!(
                    len = self.buf.len(),
                    "reply exceeds wire length field, truncating payload"
                );
                self.buf.truncate(usize::from(u16::MAX));
                u16::MAX
            }
        };
        self.buf[2..4].copy_from_slice(&write_network_u16(len));
        self.buf[4..6].copy_from_slice(&write_network_u16(!len));
        let sum = checksum::sum(&self.buf[2..usize::from(len)]);
        put_u16(&mut self.buf, sum);
        self.buf.freeze()
    }
}

/// Build the fixed 13-byte generic acknowledgement frame.
///
/// Used for commands whose reply carries no structured payload: the frame
/// id, version, and command identifier are echoed with a single status
/// byte.
#[must_use]
pub fn write_ack(frame_id: u8, version: ProtocolVersion, command: u16, status: u8) -> Bytes {
    let mut writer = FrameWriter::begin(frame_id, version);
    put_u16(writer.payload_mut(), command);
    put_u8(writer.payload_mut(), status);
    writer.finish()
}
