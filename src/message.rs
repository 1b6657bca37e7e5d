//! Typed request decoding for validated frames.
//!
//! Each command identifier selects a strict, ordered schema of fixed and
//! variable fields; there is no per-field type tag on the wire, so the
//! schema here is authoritative per command and protocol revision. The
//! command set is protocol-fixed and finite, so requests are a closed
//! tagged enum dispatched by one lookup rather than open-ended virtual
//! dispatch.
//!
//! Decoding is verbatim: no semantic validation happens here. Malformed
//! *content* inside an otherwise valid frame (a string with no terminator
//! at the true end of payload) degrades to a best-effort partial string;
//! only a fixed-width field running out of bytes rejects the frame.

use bytes::Bytes;

use crate::codec::{Cursor, DecodeError};
use crate::frame::{Frame, ProtocolVersion};

/// Command identifiers in the device protocol.
pub mod commands {
    /// "Accept server parameters": the device requests its operating
    /// configuration after connecting.
    pub const ACCEPT_SERVER_PARAMS: u16 = 0x1603;

    /// Telemetry data upload; acknowledged with the generic ack frame.
    pub const UPLOAD_DATA: u16 = 0x1601;
}

/// Decoded "accept server parameters" request, fields in wire order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptServerParams {
    /// Device identifier string.
    pub device_id: String,
    /// Trip identifier assigned by the device.
    pub trip_id: u32,
    /// Vehicle identifier.
    pub vid: String,
    /// Vehicle identification number.
    pub vin: String,
    /// Diagnosis type code.
    pub diagnosis_type: u8,
    /// Initialisation code.
    pub init_code: u8,
    /// Firmware version string.
    pub firmware_version: String,
    /// Hardware version string.
    pub hardware_version: String,
    /// Software version string.
    pub software_version: String,
}

/// One decoded request, tagged by command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Command `0x1603`.
    AcceptServerParams(AcceptServerParams),
    /// Any command without a decoder for this protocol revision; the raw
    /// payload is surfaced for an external handler to interpret.
    Unknown {
        /// Command identifier from the payload.
        command: u16,
        /// The full payload, command identifier included.
        payload: Bytes,
    },
}

impl Request {
    /// The command identifier this request was decoded from.
    #[must_use]
    pub fn command(&self) -> u16 {
        match self {
            Self::AcceptServerParams(_) => commands::ACCEPT_SERVER_PARAMS,
            Self::Unknown { command, .. } => *command,
        }
    }
}

/// Decode a validated frame into a typed request.
///
/// Unknown commands, and known commands on an unknown protocol revision,
/// decode to [`Request::Unknown`] with the raw payload attached.
///
/// # Errors
///
/// [`DecodeError::PayloadTooShort`] when the payload cannot hold the
/// two-byte command identifier; [`DecodeError::Truncated`] when a
/// fixed-width field runs out of bytes. Either way the framer has already
/// consumed the frame, so the stream continues undisturbed and the caller
/// keeps [`Frame::as_bytes`] for forensic logging.
pub fn decode_request(frame: &Frame) -> Result<Request, DecodeError> {
    let payload = frame.payload();
    let mut cursor = Cursor::new(payload);
    let command = cursor
        .read_u16("command identifier")
        .map_err(|_| DecodeError::PayloadTooShort { len: payload.len() })?;

    match (command, frame.version()) {
        (
            commands::ACCEPT_SERVER_PARAMS,
            ProtocolVersion::V2_05 | ProtocolVersion::V3_08,
        ) => decode_accept_server_params(&mut cursor).map(Request::AcceptServerParams),
        _ => Ok(Request::Unknown {
            command,
            payload: Bytes::copy_from_slice(payload),
        }),
    }
}

fn decode_accept_server_params(cursor: &mut Cursor<'_>) -> Result<AcceptServerParams, DecodeError> {
    let device_id = cursor.read_cstring();
    let trip_id = cursor.read_u32("trip id")?;
    let vid = cursor.read_cstring();
    let vin = cursor.read_cstring();
    let diagnosis_type = cursor.read_u8("diagnosis type")?;
    let init_code = cursor.read_u8("init code")?;
    let firmware_version = cursor.read_cstring();
    let hardware_version = cursor.read_cstring();
    let software_version = cursor.read_cstring();
    Ok(AcceptServerParams {
        device_id,
        trip_id,
        vid,
        vin,
        diagnosis_type,
        init_code,
        firmware_version,
        hardware_version,
        software_version,
    })
}
