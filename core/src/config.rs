//! Client configuration: where to connect and how frames are sized.
//!
//! Everything here is settled before the first connection attempt. A bad
//! value is a usage error, never a runtime transport failure.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PACKET_LEN, DEFAULT_POLL_INTERVAL, DEFAULT_QUEUE_DEPTH, HEADER_LEN, SAMPLE_WIDTH,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("packet length {packet_len} must exceed the {header_len}-byte header")]
    PacketTooShort { packet_len: usize, header_len: usize },

    #[error("payload length {payload_len} is not a multiple of the {width}-byte sample width")]
    MisalignedPayload { payload_len: usize, width: usize },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================
// Frame layout
// ============================================================

/// Fixed frame geometry agreed on by both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLayout {
    /// Total bytes per frame, header included.
    pub packet_len: usize,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self { packet_len: DEFAULT_PACKET_LEN }
    }
}

impl FrameLayout {
    pub fn new(packet_len: usize) -> Result<Self, ConfigError> {
        let layout = Self { packet_len };
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.packet_len <= HEADER_LEN {
            return Err(ConfigError::PacketTooShort {
                packet_len: self.packet_len,
                header_len: HEADER_LEN,
            });
        }
        let payload_len = self.packet_len - HEADER_LEN;
        if payload_len % SAMPLE_WIDTH != 0 {
            return Err(ConfigError::MisalignedPayload { payload_len, width: SAMPLE_WIDTH });
        }
        Ok(())
    }

    #[inline]
    pub const fn header_len(&self) -> usize {
        HEADER_LEN
    }

    #[inline]
    pub const fn payload_len(&self) -> usize {
        self.packet_len - HEADER_LEN
    }

    #[inline]
    pub const fn sample_count(&self) -> usize {
        self.payload_len() / SAMPLE_WIDTH
    }
}

// ============================================================
// Connection target
// ============================================================

/// Remote endpoint, consumed once by `transport::connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

// ============================================================
// Client config
// ============================================================

/// Tunables loaded from an optional JSON file. Missing fields take defaults.
///
/// ```json
/// { "layout": { "packet_len": 5452 }, "connect_timeout_ms": 3000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub layout: FrameLayout,
    /// Per-candidate connect timeout. `None` uses the OS default.
    pub connect_timeout_ms: Option<u64>,
    /// Upper bound on how long cancellation can go unnoticed during a read.
    pub poll_interval_ms: u64,
    /// Frames buffered between decoder and consumer.
    pub queue_depth: usize,
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            layout: FrameLayout::default(),
            connect_timeout_ms: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            nodelay: false,
        }
    }
}

impl ClientConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: ClientConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Zero { field: "poll_interval_ms" });
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::Zero { field: "queue_depth" });
        }
        if self.connect_timeout_ms == Some(0) {
            return Err(ConfigError::Zero { field: "connect_timeout_ms" });
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
