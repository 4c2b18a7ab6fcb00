//! Wire constants shared by both ends of the stream.
//!
//! The protocol carries no length field: frame size is fixed out-of-band and
//! both sides must agree on it.

use std::time::Duration;

/// Encoded header size in bytes (`device_id`, `unixtime`, `ms`, `pkt_id`).
pub const HEADER_LEN: usize = 12;

/// Default total packet length (header + payload) in bytes.
pub const DEFAULT_PACKET_LEN: usize = 5452;

/// Width of one payload sample (`i16`).
pub const SAMPLE_WIDTH: usize = 2;

/// Default payload length in bytes: 5452 - 12 = 5440.
pub const DEFAULT_PAYLOAD_LEN: usize = DEFAULT_PACKET_LEN - HEADER_LEN;

/// Default samples per payload: 5440 / 2 = 2720.
pub const DEFAULT_SAMPLE_COUNT: usize = DEFAULT_PAYLOAD_LEN / SAMPLE_WIDTH;

/// How often a blocked socket read wakes up to look at the cancel token.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Frames buffered between the decode thread and its consumer.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

/// Header field offsets.
pub mod offsets {
    pub const DEVICE_ID: usize = 0;
    pub const UNIXTIME: usize  = 2;
    pub const MS: usize        = 6;
    pub const PKT_ID: usize    = 8;
}
