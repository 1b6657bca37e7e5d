//! Error types for payload decoding.

use thiserror::Error;

/// Errors raised while decoding a validated frame's payload.
///
/// A `Truncated` field is a hard failure for that frame only: the framer has
/// already consumed the frame's bytes, so the stream continues undisturbed
/// and the caller retains the raw frame for forensic logging.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A fixed-width field needed more bytes than the payload had left.
    #[error("truncated {field}: have {have} bytes, need {need}")]
    Truncated {
        /// Protocol name of the field being read.
        field: &'static str,
        /// Bytes remaining at the cursor.
        have: usize,
        /// Bytes the field requires.
        need: usize,
    },

    /// The payload is too short to carry the two-byte command identifier.
    #[error("payload too short for command identifier: {len} bytes")]
    PayloadTooShort {
        /// Payload length in bytes.
        len: usize,
    },
}
