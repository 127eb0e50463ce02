//! OSC wire protocol support, narrowed to what an EyeTrackVR sender emits:
//! single-message datagrams carrying one float argument. Bundles are not
//! recognized and classify as malformed.

use crate::types::Channel;
use crate::{EtvrError, Result};

/// Default UDP port EyeTrackVR/VRChat-style OSC senders target.
pub const DEFAULT_PORT: u16 = 9000;

// -- Recognized address patterns --
pub const ADDR_VERTICAL: &str = "/avatar/parameters/EyesY";
pub const ADDR_LEFT_HORIZONTAL: &str = "/avatar/parameters/LeftEyeX";
pub const ADDR_RIGHT_HORIZONTAL: &str = "/avatar/parameters/RightEyeX";

/// Decode one datagram as an OSC message.
///
/// Returns `Ok(Some((channel, value)))` for the three recognized address
/// patterns, each carrying exactly one float (`,f`). A well-formed message
/// with any other address is traffic for someone else: `Ok(None)`, argument
/// stream not inspected. Corrupt encoding, wrong argument type, or wrong
/// arity is an error for the caller to discard.
pub fn decode_datagram(data: &[u8]) -> Result<Option<(Channel, f32)>> {
    if data.is_empty() {
        return Err(EtvrError::Truncated);
    }

    let (address, pos) = read_osc_string(data, 0)?;
    if !address.starts_with('/') {
        return Err(EtvrError::BadAddress);
    }

    let channel = match address {
        ADDR_LEFT_HORIZONTAL => Channel::LeftHorizontal,
        ADDR_RIGHT_HORIZONTAL => Channel::RightHorizontal,
        ADDR_VERTICAL => Channel::Vertical,
        _ => return Ok(None),
    };

    if pos >= data.len() {
        return Err(EtvrError::MissingTypeTags);
    }
    let (tags, pos) = read_osc_string(data, pos)?;
    if !tags.starts_with(',') {
        return Err(EtvrError::MissingTypeTags);
    }
    if tags != ",f" {
        return Err(EtvrError::UnexpectedArguments(tags.to_string()));
    }

    let value = read_f32(data, pos)?;
    Ok(Some((channel, value)))
}

/// Build a single-float OSC message: padded address, `,f` tag string,
/// big-endian payload.
pub fn encode_float_message(address: &str, value: f32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(padded_len(address.len()) + 4 + 4);
    write_osc_string(&mut buf, address);
    write_osc_string(&mut buf, ",f");
    buf.extend_from_slice(&value.to_be_bytes());
    buf
}

/// Size a string occupies on the wire: length plus NUL terminator, rounded
/// up to a 4-byte boundary.
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

/// Read a NUL-terminated, 4-byte-aligned OSC string starting at `pos`.
/// Returns the string and the offset just past its padding.
fn read_osc_string(data: &[u8], pos: usize) -> Result<(&str, usize)> {
    let rest = &data[pos..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(EtvrError::BadString)?;
    let s = std::str::from_utf8(&rest[..nul]).map_err(|_| EtvrError::BadString)?;

    let end = pos + padded_len(nul);
    if end > data.len() {
        return Err(EtvrError::BadString);
    }
    Ok((s, end))
}

fn read_f32(data: &[u8], pos: usize) -> Result<f32> {
    match data.get(pos..pos + 4) {
        Some(b) => Ok(f32::from_be_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(EtvrError::Truncated),
    }
}

fn write_osc_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    let pad = 4 - (s.len() % 4);
    buf.extend(std::iter::repeat(0u8).take(pad));
}
