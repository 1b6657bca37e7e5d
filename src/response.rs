//! Reply records and the defensive response encoder.
//!
//! A reply is a record of optional, count-gated sections written in the
//! protocol's fixed order. The encoder enforces only documented values for
//! each count byte, but violations are never hard errors: the offending
//! section is skipped (its count byte written as zero) or the value is
//! clamped, the event is logged, and encoding always completes with valid,
//! checksummed wire bytes. That matches the lenient-degrade policy of the
//! reference device firmware and keeps a usable, if partial, reply moving.
//!
//! Instead of scattering log calls through the encode path, every lenient
//! degrade is also collected into an [`EncodeWarning`] side channel returned
//! with the bytes, so callers and tests can inspect exactly what was
//! dropped.

use bytes::Bytes;
use thiserror::Error;

use crate::codec::{put_cstring, put_cstring_bounded, put_i16, put_u8, put_u16};
use crate::frame::{FrameWriter, ProtocolVersion, writer::write_ack};
use crate::message::commands;

/// Maximum network-config entries in one reply.
pub const MAX_NETWORK_CONFIGS: usize = 5;

/// Maximum speed-segment thresholds in one reply.
pub const MAX_SPEED_SEGMENTS: usize = 10;

/// Maximum content bytes for the update identifier string.
pub const MAX_UPDATE_ID_BYTES: usize = 18;

/// Required entry count for an enabled sleep-interval section.
pub const SLEEP_INTERVAL_COUNT: usize = 2;

/// Entry count written for an enabled alarm-threshold section.
pub const ALARM_THRESHOLD_COUNT: u8 = 3;

/// Timestamp in the wire format `YYYY-MM-DD HH:MM:SS`.
///
/// The codec stays clock free: the transport formats the current time from
/// whatever time source it owns and hands the finished value in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    /// Format a timestamp from broken-down date and time parts.
    #[must_use]
    pub fn from_parts(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        ))
    }

    /// The fixed-width ASCII form written to the wire.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

/// One server endpoint the device should report to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Server host name or dotted address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
}

/// Alarm trigger thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlarmThresholds {
    /// Overspeed alarm limit in km/h.
    pub overspeed_kph: u8,
    /// Continuous driving limit in minutes before a fatigue alarm.
    pub fatigue_driving_min: u8,
    /// Engine temperature alarm offset in degrees Celsius; signed per the
    /// field's contract.
    pub temperature_offset_c: i16,
}

/// Reply to the "accept server parameters" request (`0x1603`).
///
/// Sections are written in declaration order. Illegal section inputs are
/// skipped with a warning at encode time, never rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptServerParamsReply {
    /// Status byte echoed to the device.
    pub status: u8,
    /// Current server time; `None` writes an empty timestamp string.
    pub timestamp: Option<Timestamp>,
    /// Reporting endpoints; at most [`MAX_NETWORK_CONFIGS`].
    pub network_configs: Vec<NetworkConfig>,
    /// Strictly increasing speed thresholds; at most [`MAX_SPEED_SEGMENTS`].
    pub speed_segments: Vec<u16>,
    /// Sleep intervals; exactly [`SLEEP_INTERVAL_COUNT`] values when the
    /// section is enabled, empty when disabled.
    pub sleep_intervals: Vec<u16>,
    /// Alarm thresholds, written as a three-entry section when present.
    pub alarm_thresholds: Option<AlarmThresholds>,
    /// Firmware update identifier; truncated to [`MAX_UPDATE_ID_BYTES`].
    pub update_id: String,
}

/// A lenient degrade recorded during encoding.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeWarning {
    /// A count-gated section held more entries than the protocol allows.
    #[error("{section} section overflow: {count} entries, max {max}")]
    SectionOverflow {
        /// Section name.
        section: &'static str,
        /// Supplied entry count.
        count: usize,
        /// Documented maximum.
        max: usize,
    },

    /// A section whose count byte has a fixed legal set got another value.
    #[error("{section} section has illegal entry count {count}")]
    IllegalSectionCount {
        /// Section name.
        section: &'static str,
        /// Supplied entry count.
        count: usize,
    },

    /// Speed segments were not strictly increasing.
    #[error("speed segments not strictly increasing")]
    SpeedSegmentsNotIncreasing,

    /// A string field was truncated to its protocol maximum.
    #[error("{field} truncated: {len} bytes, max {max}")]
    StringTruncated {
        /// Field name.
        field: &'static str,
        /// Supplied byte length.
        len: usize,
        /// Documented maximum content length.
        max: usize,
    },
}

/// Finished wire bytes plus the warnings collected while building them.
#[derive(Clone, Debug)]
pub struct Encoded {
    /// The complete, checksummed frame.
    pub bytes: Bytes,
    /// Lenient degrades applied during encoding, in wire order.
    pub warnings: Vec<EncodeWarning>,
}

/// Encode an "accept server parameters" reply into wire bytes.
///
/// The frame id and protocol version are echoed from the request frame.
/// Encoding never fails; illegal section inputs degrade per section and are
/// reported in [`Encoded::warnings`] as well as logged.
#[must_use]
pub fn encode_reply(
    reply: &AcceptServerParamsReply,
    frame_id: u8,
    version: ProtocolVersion,
) -> Encoded {
    let mut warnings = Vec::new();
    let mut writer = FrameWriter::begin(frame_id, version);
    let buf = writer.payload_mut();

    put_u16(buf, commands::ACCEPT_SERVER_PARAMS);
    put_u8(buf, reply.status);
    put_cstring(buf, reply.timestamp.as_ref().map_or("", Timestamp::as_str));

    // Network configs: count byte then host/port entries.
    if reply.network_configs.len() > MAX_NETWORK_CONFIGS {
        warn(&mut warnings, EncodeWarning::SectionOverflow {
            section: "network config",
            count: reply.network_configs.len(),
            max: MAX_NETWORK_CONFIGS,
        });
        put_u8(buf, 0);
    } else {
        put_u8(buf, count_byte(reply.network_configs.len()));
        for config in &reply.network_configs {
            put_cstring(buf, &config.host);
            put_u16(buf, config.port);
        }
    }

    // Speed segments: count byte then strictly increasing thresholds.
    if reply.speed_segments.len() > MAX_SPEED_SEGMENTS {
        warn(&mut warnings, EncodeWarning::SectionOverflow {
            section: "speed segment",
            count: reply.speed_segments.len(),
            max: MAX_SPEED_SEGMENTS,
        });
        put_u8(buf, 0);
    } else if !strictly_increasing(&reply.speed_segments) {
        warn(&mut warnings, EncodeWarning::SpeedSegmentsNotIncreasing);
        put_u8(buf, 0);
    } else {
        put_u8(buf, count_byte(reply.speed_segments.len()));
        for &segment in &reply.speed_segments {
            put_u16(buf, segment);
        }
    }

    // Sleep intervals: the count byte is only ever 0 or 2.
    if reply.sleep_intervals.is_empty() || reply.sleep_intervals.len() == SLEEP_INTERVAL_COUNT {
        put_u8(buf, count_byte(reply.sleep_intervals.len()));
        for &interval in &reply.sleep_intervals {
            put_u16(buf, interval);
        }
    } else {
        warn(&mut warnings, EncodeWarning::IllegalSectionCount {
            section: "sleep interval",
            count: reply.sleep_intervals.len(),
        });
        put_u8(buf, 0);
    }

    // Alarm thresholds: the count byte is only ever 0 or 3.
    match reply.alarm_thresholds {
        Some(thresholds) => {
            put_u8(buf, ALARM_THRESHOLD_COUNT);
            put_u8(buf, thresholds.overspeed_kph);
            put_u8(buf, thresholds.fatigue_driving_min);
            put_i16(buf, thresholds.temperature_offset_c);
        }
        None => put_u8(buf, 0),
    }

    if let Some(len) =
        put_cstring_bounded(buf, &reply.update_id, MAX_UPDATE_ID_BYTES, "update id")
    {
        warnings.push(EncodeWarning::StringTruncated {
            field: "update id",
            len,
            max: MAX_UPDATE_ID_BYTES,
        });
    }

    Encoded {
        bytes: writer.finish(),
        warnings,
    }
}

/// Encode the generic 13-byte acknowledgement for commands whose reply
/// carries no structured payload.
#[must_use]
pub fn encode_ack(frame_id: u8, version: ProtocolVersion, command: u16, status: u8) -> Bytes {
    write_ack(frame_id, version, command, status)
}

fn warn(warnings: &mut Vec<EncodeWarning>, warning: EncodeWarning) {
    tracing::warn!(warning = %warning, "reply section degraded");
    warnings.push(warning);
}

fn strictly_increasing(values: &[u16]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Section counts are bounded well under `u8::MAX` by the checks above.
fn count_byte(count: usize) -> u8 { u8::try_from(count).unwrap_or(u8::MAX) }
