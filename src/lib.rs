//! Public API for the `obdwire` library.
//!
//! This crate turns a raw, possibly-fragmented TCP byte stream from
//! OBD/telematics hardware into discrete, validated protocol frames, and
//! turns structured reply data back into the exact wire bytes the device
//! expects. It provides the resynchronising stream framer, the additive
//! checksum engine, the cursor-based field codec, the typed request decoder,
//! and the defensively-encoded reply builder. Transport plumbing, command
//! dispatch, and persistence are the caller's concern.

pub mod byte_order;
pub mod checksum;
pub mod codec;
pub mod frame;
pub mod message;
pub mod registry;
pub mod response;

pub use codec::{Cursor, DecodeError};
pub use frame::{
    Extraction,
    Frame,
    FrameWriter,
    MIN_FRAME_LEN,
    ProtocolVersion,
    StreamFramer,
    write_ack,
};
pub use message::{AcceptServerParams, Request, decode_request};
pub use registry::ProtocolRegistry;
pub use response::{
    AcceptServerParamsReply,
    AlarmThresholds,
    EncodeWarning,
    Encoded,
    NetworkConfig,
    Timestamp,
    encode_ack,
    encode_reply,
};
