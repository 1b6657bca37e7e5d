//! Explicit protocol-version registry.
//!
//! Decoder selection is a plain, constructed-at-startup mapping handed to
//! the dispatch layer, not a global populated by load-time registration.
//! Registries are ordinary values, so tests can build isolated ones with
//! exactly the revisions they need.

use std::collections::HashMap;

use bytes::Bytes;

use crate::codec::DecodeError;
use crate::frame::{Frame, ProtocolVersion, StreamFramer};
use crate::message::{self, Request};

/// Decode entry point for one protocol revision.
pub type RequestDecoder = fn(&Frame) -> Result<Request, DecodeError>;

/// Framer configuration plus the decode entry point for one revision.
#[derive(Clone, Copy, Debug)]
pub struct WireCodec {
    /// Extraction configuration for connections speaking this revision.
    pub framer: StreamFramer,
    /// Typed request decoder.
    pub decode: RequestDecoder,
}

impl WireCodec {
    /// Codec with the default framer and the full command decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            framer: StreamFramer::new(),
            decode: message::decode_request,
        }
    }
}

impl Default for WireCodec {
    fn default() -> Self { Self::new() }
}

/// Header-only decoding for revisions without registered command semantics.
fn decode_header_only(frame: &Frame) -> Result<Request, DecodeError> {
    let payload = frame.payload();
    match frame.command_id() {
        Some(command) => Ok(Request::Unknown {
            command,
            payload: Bytes::copy_from_slice(payload),
        }),
        None => Err(DecodeError::PayloadTooShort { len: payload.len() }),
    }
}

/// Map from protocol revision to wire codec.
#[derive(Clone, Debug)]
pub struct ProtocolRegistry {
    entries: HashMap<ProtocolVersion, WireCodec>,
    fallback: WireCodec,
}

impl ProtocolRegistry {
    /// An empty registry; every revision falls back to header-only decoding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: WireCodec {
                framer: StreamFramer::new(),
                decode: decode_header_only,
            },
        }
    }

    /// Registry with codecs for the supported revisions, 2.05 and 3.08.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ProtocolVersion::V2_05, WireCodec::new());
        registry.register(ProtocolVersion::V3_08, WireCodec::new());
        registry
    }

    /// Register or replace the codec for `version`.
    pub fn register(&mut self, version: ProtocolVersion, codec: WireCodec) {
        self.entries.insert(version, codec);
    }

    /// The codec for `version`, or the header-only fallback.
    #[must_use]
    pub fn codec_for(&self, version: ProtocolVersion) -> &WireCodec {
        self.entries.get(&version).unwrap_or(&self.fallback)
    }

    /// Decode `frame` with the codec registered for its revision.
    ///
    /// # Errors
    /// Propagates the selected decoder's [`DecodeError`].
    pub fn decode(&self, frame: &Frame) -> Result<Request, DecodeError> {
        (self.codec_for(frame.version()).decode)(frame)
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self { Self::new() }
}
