//! transport/connection.rs
//!
//! One byte-stream connection with exact-length blocking reads.
//!
//! Design notes:
//! - Generic over `Read` so in-memory streams can stand in for TCP.
//! - On TCP the socket read timeout is the cancellation poll interval: a
//!   blocked read wakes up, checks the token, and goes back to waiting.
//! - `Ok(0)` from the stream is the only way to get `ConnectionClosed`.

use std::io::{ErrorKind, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::{ClientConfig, ConnectionTarget};
use crate::constants::DEFAULT_POLL_INTERVAL;
use crate::transport::cancel::CancelToken;
use crate::transport::error::{ConnectError, TransportError};

/// Socket-level knobs applied by `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub connect_timeout: Option<Duration>,
    pub poll_interval: Duration,
    pub nodelay: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            nodelay: false,
        }
    }
}

impl From<&ClientConfig> for ConnectOptions {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            poll_interval: cfg.poll_interval(),
            nodelay: cfg.nodelay,
        }
    }
}

/// Resolve `target` and connect to the first candidate that accepts, in
/// resolver order.
pub fn connect(
    target: &ConnectionTarget,
    opts: &ConnectOptions,
    cancel: CancelToken,
) -> Result<Connection<TcpStream>, ConnectError> {
    let label = target.to_string();
    let candidates: Vec<SocketAddr> = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve { target: label.clone(), source })?
        .collect();
    tracing::debug!(target: "transport", "{} resolved to {:?}", label, candidates);

    connect_addrs(&label, &candidates, opts, cancel)
}

/// Try `candidates` in order and keep the first that accepts.
///
/// The token is checked before every attempt, so an interrupt stops the walk
/// at the next candidate. A single attempt without `connect_timeout` still
/// blocks for as long as the OS lets it.
pub fn connect_addrs(
    label: &str,
    candidates: &[SocketAddr],
    opts: &ConnectOptions,
    cancel: CancelToken,
) -> Result<Connection<TcpStream>, ConnectError> {
    if candidates.is_empty() {
        return Err(ConnectError::NoCandidates { target: label.to_owned() });
    }

    let mut last = None;
    for addr in candidates {
        if cancel.is_cancelled() {
            return Err(ConnectError::Cancelled { target: label.to_owned() });
        }
        let attempt = match opts.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        let stream = match attempt.and_then(|s| configure(s, opts)) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(target: "transport", "connect {} failed: {}", addr, e);
                last = Some(e);
                continue;
            }
        };
        tracing::info!(target: "transport", "connected to {} ({})", label, addr);
        let mut conn = Connection::new(stream, cancel);
        conn.peer = Some(*addr);
        return Ok(conn);
    }

    Err(ConnectError::AllFailed {
        target: label.to_owned(),
        attempts: candidates.len(),
        last: last.unwrap_or_else(|| ErrorKind::NotConnected.into()),
    })
}

fn configure(stream: TcpStream, opts: &ConnectOptions) -> std::io::Result<TcpStream> {
    stream.set_read_timeout(Some(opts.poll_interval))?;
    if opts.nodelay {
        stream.set_nodelay(true)?;
    }
    Ok(stream)
}

/// An established stream plus the token that can cancel reads on it.
#[derive(Debug)]
pub struct Connection<S = TcpStream> {
    stream: S,
    cancel: CancelToken,
    peer: Option<SocketAddr>,
    bytes_read: u64,
}

impl<S: Read> Connection<S> {
    /// Wrap an already-open stream. For sockets, set a read timeout first or
    /// cancellation is only seen between reads.
    pub fn new(stream: S, cancel: CancelToken) -> Self {
        Self { stream, cancel, peer: None, bytes_read: 0 }
    }

    /// Fill `buf` completely or fail. Never returns a short read.
    ///
    /// # Errors
    /// - `Cancelled` if shutdown was requested before or during the read.
    /// - `ConnectionClosed` if the peer ends the stream first, whether or not
    ///   any bytes of this read had arrived.
    /// - `Io` for anything else.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        let expected = buf.len();
        let mut received = 0;

        while received < expected {
            if self.cancel.is_cancelled() {
                return Err(TransportError::Cancelled);
            }
            match self.stream.read(&mut buf[received..]) {
                Ok(0) => {
                    return Err(TransportError::ConnectionClosed { received, expected });
                }
                Ok(n) => {
                    received += n;
                    self.bytes_read += n as u64;
                }
                // Read timeout elapsed: a safe point to look at the token.
                Err(e) if is_poll_wakeup(&e) => continue,
                Err(e) => return Err(TransportError::Io(e)),
            }
        }
        Ok(())
    }

    /// Ask any current or future read to stop with `Cancelled`.
    /// Returns `true` if this was the first request.
    pub fn shutdown(&self) -> bool {
        self.cancel.cancel()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A handle another thread can use to request shutdown.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

/// A read or write that timed out on a socket with `SO_RCVTIMEO`/`SO_SNDTIMEO`.
///
/// Unix reports an elapsed socket timeout as `EAGAIN` (`WouldBlock`); there
/// `TimedOut` is `ETIMEDOUT`, a dead peer, and stays a real fault. Windows
/// reports the elapsed timeout itself as `TimedOut`.
pub(crate) fn is_poll_wakeup(e: &std::io::Error) -> bool {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::Interrupted => true,
        #[cfg(windows)]
        ErrorKind::TimedOut => true,
        _ => false,
    }
}
