//! headers/types.rs
//! Frame header record and its errors.
//!
//! Notes:
//! - 12 bytes, fixed length, no padding, fields in declaration order.
//! - Little-endian on the wire regardless of host byte order.
//! - Decoding is by explicit byte offset, never by native struct layout.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::HEADER_LEN;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameHeader {
    pub device_id: u16, // 0..2   sender device
    pub unixtime: u32,  // 2..6   seconds since epoch
    pub ms: u16,        // 6..8   millisecond offset
    pub pkt_id: i32,    // 8..12  sender packet counter
}

impl FrameHeader {
    pub const LEN: usize = 2  // device_id
        + 4                   // unixtime
        + 2                   // ms
        + 4;                  // pkt_id

    pub fn new(device_id: u16, unixtime: u32, ms: u16, pkt_id: i32) -> Self {
        Self { device_id, unixtime, ms, pkt_id }
    }

    /// Canonical header for tests.
    pub fn test_header(pkt_id: i32) -> Self {
        Self {
            device_id: 2,
            unixtime: 1_705_604_840,
            ms: 100,
            pkt_id,
        }
    }

    /// Wall-clock time the sender stamped on this frame.
    ///
    /// `ms` values of 1000 or more carry into seconds. Returns `None` only if
    /// the result is outside chrono's representable range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = self.unixtime as i64 + (self.ms / 1000) as i64;
        let nanos = (self.ms % 1000) as u32 * 1_000_000;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }

    /// Milliseconds since epoch.
    pub fn epoch_millis(&self) -> u64 {
        self.unixtime as u64 * 1000 + self.ms as u64
    }
}

const _: () = assert!(FrameHeader::LEN == HEADER_LEN);

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device={} pkt_id={} unixtime={} ms={}",
            self.device_id, self.pkt_id, self.unixtime, self.ms
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Buffer too short to contain a header.
    #[error("header buffer too short: {have} < {need}")]
    BufferTooShort { have: usize, need: usize },
}
