use std::io;

/// Failure to establish the connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("cannot resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("{target} resolved to no addresses")]
    NoCandidates { target: String },

    #[error("all {attempts} connection attempt(s) to {target} failed, last error: {last}")]
    AllFailed {
        target: String,
        attempts: usize,
        #[source]
        last: io::Error,
    },

    /// Shutdown was requested before a candidate accepted.
    #[error("connecting to {target} cancelled")]
    Cancelled { target: String },
}

impl ConnectError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConnectError::Cancelled { .. })
    }
}

/// Failure of an exact read on an established connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Peer closed the stream before the requested bytes arrived.
    #[error("connection closed by peer after {received} of {expected} bytes")]
    ConnectionClosed { received: usize, expected: usize },

    /// Any other transport fault (reset, unreachable, ...).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Shutdown was requested.
    #[error("cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::ConnectionClosed { .. })
    }
}
