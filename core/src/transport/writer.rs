//! transport/writer.rs
//!
//! Sending side counterpart of `Connection::read_exact`: a `Write` adapter
//! whose blocked writes wake up on the socket write timeout and give up once
//! the token is cancelled.

use std::io::{self, ErrorKind, Write};

use crate::transport::cancel::CancelToken;
use crate::transport::connection::is_poll_wakeup;
use crate::transport::error::TransportError;

/// Wraps a stream whose writes time out (e.g. a `TcpStream` with
/// `set_write_timeout`). Without a timeout a write to a peer that stopped
/// reading blocks until the peer goes away, token or not.
#[derive(Debug)]
pub struct CancellableWriter<W> {
    inner: W,
    cancel: CancelToken,
}

impl<W: Write> CancellableWriter<W> {
    pub fn new(inner: W, cancel: CancelToken) -> Self {
        Self { inner, cancel }
    }

    fn cancelled() -> io::Error {
        io::Error::new(ErrorKind::Other, TransportError::Cancelled)
    }
}

impl<W: Write> Write for CancellableWriter<W> {
    /// Retries timed-out writes until some bytes go out or the token is
    /// cancelled. Partial writes are returned as-is, so `write_all` never
    /// repeats or drops bytes across a timeout.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(Self::cancelled());
            }
            match self.inner.write(buf) {
                Err(e) if is_poll_wakeup(&e) => continue,
                other => return other,
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(Self::cancelled());
            }
            match self.inner.flush() {
                Err(e) if is_poll_wakeup(&e) => continue,
                other => return other,
            }
        }
    }
}
