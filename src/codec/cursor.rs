//! Explicit read cursor over a borrowed payload slice.

use crate::byte_order::{
    read_network_i16,
    read_network_i32,
    read_network_u16,
    read_network_u32,
};

use super::error::DecodeError;

/// Position plus borrowed bytes, threaded through pure read calls.
///
/// Every fixed-width read either returns the value and advances the
/// position, or fails with [`DecodeError::Truncated`] and leaves the cursor
/// untouched. Field names are carried into errors so a rejected frame can be
/// attributed to the exact field that ran short.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self { Self { buf, pos: 0 } }

    /// Current position from the start of the slice.
    #[must_use]
    pub fn position(&self) -> usize { self.pos }

    /// Bytes left to read.
    #[must_use]
    pub fn remaining(&self) -> usize { self.buf.len() - self.pos }

    /// The unread tail of the slice.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] { &self.buf[self.pos..] }

    fn take<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let have = self.remaining();
        if have < N {
            return Err(DecodeError::Truncated {
                field,
                have,
                need: N,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    /// Read one unsigned byte.
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if no bytes remain.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        self.take::<1>(field).map(|[b]| b)
    }

    /// Read a big-endian `u16`.
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if fewer than two bytes remain.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        self.take::<2>(field).map(read_network_u16)
    }

    /// Read a big-endian `u32`.
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if fewer than four bytes remain.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        self.take::<4>(field).map(read_network_u32)
    }

    /// Read a big-endian `i16` for fields documented as signed.
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if fewer than two bytes remain.
    pub fn read_i16(&mut self, field: &'static str) -> Result<i16, DecodeError> {
        self.take::<2>(field).map(read_network_i16)
    }

    /// Read a big-endian `i32` for fields documented as signed.
    ///
    /// # Errors
    /// Returns [`DecodeError::Truncated`] if fewer than four bytes remain.
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.take::<4>(field).map(read_network_i32)
    }

    /// Read bytes until a `0x00` terminator or the end of the payload.
    ///
    /// Reaching the end without a terminator is not an error: the remaining
    /// bytes become the string, mirroring lenient device firmware. The
    /// terminator, when present, is consumed but not included. Invalid UTF-8
    /// degrades lossily rather than rejecting the frame.
    #[must_use]
    pub fn read_cstring(&mut self) -> String {
        let rest = &self.buf[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                self.pos += nul + 1;
                String::from_utf8_lossy(&rest[..nul]).into_owned()
            }
            None => {
                self.pos = self.buf.len();
                String::from_utf8_lossy(rest).into_owned()
            }
        }
    }
}
