//! Stream doubles shared by the integration tests.

#![allow(dead_code)]

use std::io::{self, ErrorKind, Read};
use std::thread;
use std::time::Duration;

use framestream_core::config::FrameLayout;
use framestream_core::framing::FrameWriter;
use framestream_core::headers::FrameHeader;
use framestream_core::transport::CancelToken;

/// Small layout so byte-level tests stay readable: 12-byte header + 8 samples.
pub fn small_layout() -> FrameLayout {
    FrameLayout { packet_len: 12 + 16 }
}

/// `n` consecutive frames, pkt_id 0..n, samples derived from the pkt_id.
pub fn wire(layout: &FrameLayout, n: usize) -> Vec<u8> {
    let mut w = FrameWriter::new(Vec::new(), *layout);
    for i in 0..n {
        let samples: Vec<i16> = (0..layout.sample_count()).map(|s| (i * 100 + s) as i16).collect();
        w.write_parts(FrameHeader::test_header(i as i32), &samples).unwrap();
    }
    w.into_inner()
}

/// Serves `data` in slices of at most `chunk` bytes, then end-of-stream.
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self { data, pos: 0, chunk }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Serves `data`, then behaves like an idle socket with a read timeout:
/// every further read is `WouldBlock` after a short sleep.
pub struct StallingReader {
    data: Vec<u8>,
    pos: usize,
}

impl StallingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl Read for StallingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() {
            thread::sleep(Duration::from_millis(2));
            return Err(ErrorKind::WouldBlock.into());
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Serves `data`, then fails every read with `kind`.
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    kind: ErrorKind,
}

impl FailingReader {
    pub fn new(data: Vec<u8>, kind: ErrorKind) -> Self {
        Self { data, pos: 0, kind }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() {
            return Err(self.kind.into());
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Serves `data` one byte at a time and trips `cancel` as the byte at
/// `trip_at` is handed out.
pub struct TrippingReader {
    data: Vec<u8>,
    pos: usize,
    trip_at: usize,
    cancel: CancelToken,
}

impl TrippingReader {
    pub fn new(data: Vec<u8>, trip_at: usize, cancel: CancelToken) -> Self {
        Self { data, pos: 0, trip_at, cancel }
    }
}

impl Read for TrippingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        if self.pos == self.trip_at {
            self.cancel.cancel();
        }
        self.pos += 1;
        Ok(1)
    }
}
