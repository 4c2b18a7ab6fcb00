//! src/telemetry/snapshot.rs
//!
//! Immutable view of counters and timers at the moment the loop stopped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub frames_emitted: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    pub partial_frames_discarded: u64,
    /// Every byte pulled off the connection, including discarded partials.
    pub bytes_received: u64,
    pub frames_per_sec: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer, bytes_received: u64) -> Self {
        let elapsed = timer.elapsed();
        let secs = elapsed.as_secs_f64();
        let (frames_per_sec, throughput) = if secs > 0.0 {
            (
                counters.frames_emitted as f64 / secs,
                counters.bytes_total() as f64 / secs,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            frames_emitted: counters.frames_emitted,
            bytes_header: counters.bytes_header,
            bytes_payload: counters.bytes_payload,
            partial_frames_discarded: counters.partial_frames_discarded,
            bytes_received,
            frames_per_sec,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Internal consistency:
    /// - emitted frame bytes never exceed what came off the wire
    /// - stage time never exceeds wall time
    pub fn sanity_check(&self) -> bool {
        self.bytes_header + self.bytes_payload <= self.bytes_received
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
