//! telemetry/counters.rs
//! Mutable counters kept by the decode loop.
//!
//! Summary: frame and byte counts, turned into an immutable
//! `TelemetrySnapshot` when the loop stops.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_emitted: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    /// Frames whose header arrived but whose payload never completed.
    pub partial_frames_discarded: u64,
}

impl TelemetryCounters {
    /// Record one frame handed to the sink.
    pub fn add_frame(&mut self, header_len: usize, payload_len: usize) {
        self.frames_emitted += 1;
        self.bytes_header += header_len as u64;
        self.bytes_payload += payload_len as u64;
    }

    pub fn add_discarded(&mut self) {
        self.partial_frames_discarded += 1;
    }

    /// Bytes accounted to emitted frames.
    pub fn bytes_total(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_emitted += other.frames_emitted;
        self.bytes_header += other.bytes_header;
        self.bytes_payload += other.bytes_payload;
        self.partial_frames_discarded += other.partial_frames_discarded;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
