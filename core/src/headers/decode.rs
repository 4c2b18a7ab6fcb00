//! src/headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Every field is pulled from its fixed offset with an explicit byte order.
//! - No validation beyond length: every 12-byte pattern is a valid header.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{offsets, HEADER_LEN};
use crate::headers::types::{FrameHeader, HeaderError};

/// Decode a header from exactly 12 bytes. Infallible; the decode loop uses
/// this on its fixed header buffer.
#[inline]
pub fn decode_header_array(buf: &[u8; HEADER_LEN]) -> FrameHeader {
    FrameHeader {
        device_id: LittleEndian::read_u16(&buf[offsets::DEVICE_ID..offsets::UNIXTIME]),
        unixtime:  LittleEndian::read_u32(&buf[offsets::UNIXTIME..offsets::MS]),
        ms:        LittleEndian::read_u16(&buf[offsets::MS..offsets::PKT_ID]),
        pkt_id:    LittleEndian::read_i32(&buf[offsets::PKT_ID..HEADER_LEN]),
    }
}

/// Decode a header from the first 12 bytes of `buf`.
///
/// # Returns
/// - `Ok(FrameHeader)` when at least 12 bytes are present (extra bytes are ignored).
/// - `Err(HeaderError::BufferTooShort)` otherwise.
#[inline]
pub fn decode_header_le(buf: &[u8]) -> Result<FrameHeader, HeaderError> {
    let head: &[u8; HEADER_LEN] = buf
        .get(..HEADER_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(HeaderError::BufferTooShort { have: buf.len(), need: HEADER_LEN })?;
    Ok(decode_header_array(head))
}
