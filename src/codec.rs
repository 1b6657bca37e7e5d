//! Field-level binary codec for device protocol payloads.
//!
//! Payloads carry fixed-width big-endian integers and null-terminated
//! strings in a strict, protocol-documented order; there is no
//! self-describing type tag per field. Reading happens through a
//! [`Cursor`] — an explicit position over a borrowed byte slice — so
//! aliasing and progress are visible at every call site rather than hidden
//! in shared mutable buffer state. Writing appends to a `BytesMut` through
//! the helpers in [`writer`].
//!
//! # Error Handling
//!
//! Running out of bytes mid-way through a fixed-width field is a hard
//! [`DecodeError::Truncated`] for the frame being decoded. Strings are
//! deliberately lenient: a missing `0x00` terminator at the true end of the
//! payload yields the remaining bytes as the string, matching device
//! firmware behaviour.

pub mod cursor;
pub mod error;
pub mod writer;

pub use cursor::Cursor;
pub use error::DecodeError;
pub use writer::{put_cstring, put_cstring_bounded, put_i16, put_u8, put_u16, put_u32};
