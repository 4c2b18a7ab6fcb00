use crate::{
    config::ConfigError,
    framing::{FrameError, SinkError},
    headers::HeaderError,
    transport::{ConnectError, TransportError},
};

/// Unified error for everything between startup and the end of the stream.
/// - `From<T>` impls let `?` cross layer boundaries.
/// - `class()` buckets errors for exit codes and log levels.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Bad configuration; raised before any connection attempt.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Resolution or connection establishment failed.
    #[error("connect error: {0}")]
    Connect(#[from] ConnectError),

    /// An exact read failed (closed, I/O, cancelled).
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Coarse error buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Usage,
    Connect,
    Closed,
    Io,
    Cancelled,
    Sink,
}

impl StreamError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StreamError::Config(_) => ErrorClass::Usage,
            StreamError::Connect(e) if e.is_cancelled() => ErrorClass::Cancelled,
            StreamError::Connect(_) => ErrorClass::Connect,
            StreamError::Transport(TransportError::ConnectionClosed { .. }) => ErrorClass::Closed,
            StreamError::Transport(TransportError::Cancelled) => ErrorClass::Cancelled,
            StreamError::Transport(TransportError::Io(_)) => ErrorClass::Io,
            StreamError::Header(_) | StreamError::Frame(_) => ErrorClass::Io,
            StreamError::Sink(_) => ErrorClass::Sink,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.class() == ErrorClass::Cancelled
    }

    pub fn is_closed(&self) -> bool {
        self.class() == ErrorClass::Closed
    }
}
