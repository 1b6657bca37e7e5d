//! Resynchronising frame extraction from a connection receive buffer.
//!
//! One [`StreamFramer`] is owned per connection and invoked serially each
//! time bytes arrive; all stream state lives in the caller's `BytesMut`, so
//! the framer itself holds only configuration. Corruption is never fatal:
//! a failed match advances the read position by exactly one byte and the
//! scan restarts, so the extractor self-heals within a few steps and
//! provably terminates (every failed attempt consumes at least one byte).
//!
//! Single-byte resynchronisation matters in both directions. Marker bytes
//! can occur inside the payload of a corrupted frame, so a marker match is
//! only trusted once the length complement and checksum confirm it; and a
//! spurious match must not be skipped aggressively, because a real frame
//! may start one byte after it.

use std::io;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::byte_order::read_network_u16;
use crate::checksum;

use super::{CHECKSUM_LEN, Frame, HEADER_LEN, MARKER, MIN_FRAME_LEN};

/// Hard cap on unread buffered bytes before the denial-of-service guard
/// clears the buffer (2 MiB).
pub const MAX_BUFFERED: usize = 2 * 1024 * 1024;

/// Result of one extraction pass over a receive buffer.
#[derive(Debug, Default)]
pub struct Extraction {
    /// Complete frames recovered, in stream order.
    pub frames: Vec<Frame>,
    /// Bytes discarded by resynchronisation or the oversize guard.
    pub discarded: usize,
    /// Whether the oversize guard fired and cleared the buffer.
    pub overflowed: bool,
}

/// Outcome of examining the buffer head once.
enum Step {
    Frame(Frame),
    Skip(&'static str),
    NeedMore,
    Overflow,
}

/// Per-connection stream framer.
///
/// Pure with respect to its output given the buffer contents; safe to
/// invoke repeatedly as new bytes arrive. The caller must not run two
/// extraction calls concurrently on the same buffer.
#[derive(Clone, Copy, Debug)]
pub struct StreamFramer {
    max_buffered: usize,
}

impl StreamFramer {
    /// Framer with the default 2 MiB buffer cap.
    #[must_use]
    pub fn new() -> Self { Self { max_buffered: MAX_BUFFERED } }

    /// Framer with a custom buffer cap, floored at one frame's minimum.
    #[must_use]
    pub fn with_max_buffered(max_buffered: usize) -> Self {
        Self {
            max_buffered: max_buffered.max(MIN_FRAME_LEN),
        }
    }

    /// The configured buffer cap.
    #[must_use]
    pub fn max_buffered(&self) -> usize { self.max_buffered }

    fn step(&self, buf: &mut BytesMut) -> Step {
        // Unbounded accumulation from a non-conforming peer is an abuse
        // condition; dropping the whole buffer is a deliberate data-loss
        // tradeoff reported to the caller, never silent.
        if buf.len() > self.max_buffered {
            return Step::Overflow;
        }
        if buf.len() < MIN_FRAME_LEN {
            return Step::NeedMore;
        }
        if buf[..2] != MARKER {
            return Step::Skip("no marker at read position");
        }
        let len_field = read_network_u16([buf[2], buf[3]]);
        let complement = read_network_u16([buf[4], buf[5]]);
        if complement != !len_field {
            return Step::Skip("length complement mismatch");
        }
        let len = usize::from(len_field);
        if len < HEADER_LEN {
            return Step::Skip("length below fixed header size");
        }
        let total = len + CHECKSUM_LEN;
        if buf.len() < total {
            // Partial frame from stream fragmentation; keep the cursor so
            // the same bytes are re-evaluated once more data arrives.
            return Step::NeedMore;
        }
        let expected = read_network_u16([buf[len], buf[len + 1]]);
        if !checksum::verify(&buf[2..len], expected) {
            tracing::debug!(
                expected,
                actual = checksum::sum(&buf[2..len]),
                "frame checksum mismatch"
            );
            return Step::Skip("checksum mismatch");
        }
        Step::Frame(Frame::new_unchecked(buf.split_to(total).freeze()))
    }

    /// Extract every complete frame currently in `buf`.
    ///
    /// Consumed and discarded bytes are removed from the buffer; what
    /// remains is the unconsumed prefix of a not-yet-complete frame.
    pub fn extract(&self, buf: &mut BytesMut) -> Extraction {
        let mut out = Extraction::default();
        loop {
            match self.step(buf) {
                Step::Frame(frame) => {
                    tracing::trace!(
                        len = frame.len(),
                        version = frame.version().revision(),
                        "frame extracted"
                    );
                    out.frames.push(frame);
                }
                Step::Skip(reason) => {
                    tracing::trace!(reason, "resynchronising: skipping one byte");
                    buf.advance(1);
                    out.discarded += 1;
                }
                Step::NeedMore => return out,
                Step::Overflow => {
                    tracing::warn!(
                        buffered = buf.len(),
                        max = self.max_buffered,
                        "receive buffer exceeded cap, discarding all buffered bytes"
                    );
                    out.discarded += buf.len();
                    out.overflowed = true;
                    buf.clear();
                    return out;
                }
            }
        }
    }
}

impl Default for StreamFramer {
    fn default() -> Self { Self::new() }
}

/// `tokio_util` integration: drive the framer from a `FramedRead`.
impl Decoder for StreamFramer {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.step(src) {
                Step::Frame(frame) => return Ok(Some(frame)),
                Step::Skip(reason) => {
                    tracing::trace!(reason, "resynchronising: skipping one byte");
                    src.advance(1);
                }
                Step::NeedMore => return Ok(None),
                Step::Overflow => {
                    // Whether to disconnect is the transport's policy; the
                    // decoder only sheds the buffered bytes and continues.
                    tracing::warn!(
                        buffered = src.len(),
                        max = self.max_buffered,
                        "receive buffer exceeded cap, discarding all buffered bytes"
                    );
                    src.clear();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let frame = self.decode(src)?;
        if frame.is_none() && !src.is_empty() {
            tracing::debug!(
                remaining = src.len(),
                "connection closed with partial frame buffered"
            );
            src.clear();
        }
        Ok(frame)
    }
}

/// Borrow-free handoff helper: extract frames and return the retained tail.
///
/// Convenience for transports that own their buffer elsewhere and feed the
/// framer copies.
#[must_use]
pub fn extract_from(framer: &StreamFramer, input: &[u8]) -> (Extraction, Bytes) {
    let mut buf = BytesMut::from(input);
    let extraction = framer.extract(&mut buf);
    (extraction, buf.freeze())
}
