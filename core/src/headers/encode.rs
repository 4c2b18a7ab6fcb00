//! src/headers/encode.rs
//!
//! Header encoding. Used by the synthetic source and by tests; the client only
//! decodes.

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::{offsets, HEADER_LEN};
use crate::headers::types::FrameHeader;

/// Serialize a `FrameHeader` into its 12-byte little-endian wire form.
#[inline]
pub fn encode_header_le(h: &FrameHeader) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];

    // Field order must match decode.rs.
    LittleEndian::write_u16(&mut out[offsets::DEVICE_ID..offsets::UNIXTIME], h.device_id); // 0..2
    LittleEndian::write_u32(&mut out[offsets::UNIXTIME..offsets::MS], h.unixtime);         // 2..6
    LittleEndian::write_u16(&mut out[offsets::MS..offsets::PKT_ID], h.ms);                 // 6..8
    LittleEndian::write_i32(&mut out[offsets::PKT_ID..HEADER_LEN], h.pkt_id);              // 8..12

    out
}
