//! framestream-core
//!
//! Blocking client for a fixed-size framed telemetry stream over TCP.
//! Each frame is a 12-byte little-endian header followed by a fixed block of
//! `i16` samples. No length field travels on the wire; both ends share the
//! layout.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;

pub mod headers;
pub mod telemetry;

// Stream layers
pub mod transport;
pub mod framing;

pub mod prelude {
    pub use crate::config::{ClientConfig, ConnectionTarget, FrameLayout};
    pub use crate::framing::{ChannelSink, Frame, FrameDecoder, FrameSink, Payload, SinkError};
    pub use crate::headers::FrameHeader;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::transport::{CancelToken, Connection};
    pub use crate::types::{ErrorClass, StreamError};
}
