//! framing/decode.rs
//!
//! The frame decode loop and slice-level frame decoding.
//!
//! Design notes:
//! - Two states per iteration: `AwaitingHeader`, `AwaitingPayload`.
//! - Frame size comes from the layout, never from a header field.
//! - Any read failure drops whatever partial frame existed.
//! - Cancellation is checked at every phase boundary, emission included.

use std::io::Read;
use std::net::TcpStream;
use std::time::Instant;

use bytes::Bytes;

use crate::config::{ClientConfig, ConnectionTarget, FrameLayout};
use crate::constants::HEADER_LEN;
use crate::framing::sink::FrameSink;
use crate::framing::types::{Frame, FrameError, Payload};
use crate::headers::{decode_header_array, decode_header_le, FrameHeader};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::transport::{self, CancelToken, ConnectOptions, Connection, TransportError};
use crate::types::StreamError;

/// Decode one complete frame from a byte slice of exactly `layout.packet_len`.
pub fn decode_frame(wire: &[u8], layout: &FrameLayout) -> Result<Frame, FrameError> {
    if wire.len() != layout.packet_len {
        return Err(FrameError::LengthMismatch {
            expected: layout.packet_len,
            actual: wire.len(),
        });
    }
    let header = decode_header_le(wire)?;
    let payload = Payload::from_bytes(Bytes::copy_from_slice(&wire[HEADER_LEN..]));
    Ok(Frame::new(header, payload))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    AwaitingHeader,
    /// Header decoded; its payload has not fully arrived.
    AwaitingPayload(FrameHeader),
}

/// Pulls frames off a connection, one header + payload pair at a time.
#[derive(Debug)]
pub struct FrameDecoder<S = TcpStream> {
    conn: Connection<S>,
    layout: FrameLayout,
    state: DecoderState,
    header_buf: [u8; HEADER_LEN],
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl FrameDecoder<TcpStream> {
    /// Connect to `target` and build a decoder for the configured layout.
    /// Connection time is recorded under `Stage::Connect`.
    pub fn connect(
        target: &ConnectionTarget,
        config: &ClientConfig,
        cancel: CancelToken,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        let opts = ConnectOptions::from(config);
        let mut timer = TelemetryTimer::new();
        let conn = timer.time(Stage::Connect, || transport::connect(target, &opts, cancel))?;
        Ok(Self::with_timer(conn, config.layout, timer))
    }
}

impl<S: Read> FrameDecoder<S> {
    pub fn new(conn: Connection<S>, layout: FrameLayout) -> Self {
        Self::with_timer(conn, layout, TelemetryTimer::new())
    }

    fn with_timer(conn: Connection<S>, layout: FrameLayout, timer: TelemetryTimer) -> Self {
        Self {
            conn,
            layout,
            state: DecoderState::AwaitingHeader,
            header_buf: [0u8; HEADER_LEN],
            counters: TelemetryCounters::default(),
            timer,
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.conn
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.conn.cancel_token()
    }

    /// Request shutdown of the loop. Idempotent.
    pub fn shutdown(&self) -> bool {
        self.conn.shutdown()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer, self.conn.bytes_read())
    }

    /// Run one full iteration: header phase, payload phase, frame.
    ///
    /// On error the decoder is back in `AwaitingHeader` and any bytes of the
    /// interrupted frame are gone.
    pub fn next_frame(&mut self) -> Result<Frame, StreamError> {
        loop {
            match self.state {
                DecoderState::AwaitingHeader => {
                    let header = self.read_header()?;
                    self.state = DecoderState::AwaitingPayload(header);
                }
                DecoderState::AwaitingPayload(header) => {
                    // Partial frame state never survives this arm.
                    self.state = DecoderState::AwaitingHeader;

                    let mut buf = vec![0u8; self.layout.payload_len()];
                    let t = Instant::now();
                    let res = self.conn.read_exact(&mut buf);
                    self.timer.add_stage_time(Stage::ReadPayload, t.elapsed());

                    if let Err(e) = res {
                        self.counters.add_discarded();
                        tracing::debug!(target: "decoder", "dropping pkt_id={} mid-payload: {}", header.pkt_id, e);
                        return Err(e.into());
                    }
                    if self.conn.is_cancelled() {
                        self.counters.add_discarded();
                        return Err(TransportError::Cancelled.into());
                    }
                    return Ok(Frame::new(header, Payload::from_bytes(Bytes::from(buf))));
                }
            }
        }
    }

    fn read_header(&mut self) -> Result<FrameHeader, StreamError> {
        let t = Instant::now();
        let res = self.conn.read_exact(&mut self.header_buf);
        self.timer.add_stage_time(Stage::ReadHeader, t.elapsed());
        res?;

        let buf = &self.header_buf;
        let header = self.timer.time(Stage::Decode, || decode_header_array(buf));
        tracing::trace!(target: "decoder", "header {} -> {}", hex::encode(buf), header);
        Ok(header)
    }

    /// Decode frames into `sink` until the stream stops.
    ///
    /// # Returns
    /// - `Ok(snapshot)` when the loop was cancelled: the normal way out.
    /// - `Err(StreamError::Transport(ConnectionClosed))` when the peer hung up.
    /// - `Err(..)` for I/O faults and sink failures.
    pub fn run<K: FrameSink + ?Sized>(&mut self, sink: &mut K) -> Result<TelemetrySnapshot, StreamError> {
        tracing::debug!(
            target: "decoder",
            "decode loop start: header={}B payload={}B",
            self.layout.header_len(),
            self.layout.payload_len()
        );

        let stop = loop {
            let frame = match self.next_frame() {
                Ok(frame) => frame,
                Err(e) => break e,
            };
            let payload_len = frame.payload.byte_len();

            let t = Instant::now();
            let res = sink.accept(frame);
            self.timer.add_stage_time(Stage::Emit, t.elapsed());
            if let Err(e) = res {
                break e.into();
            }
            self.counters.add_frame(HEADER_LEN, payload_len);
        };
        self.timer.finish();

        let frames = self.counters.frames_emitted;
        match stop {
            StreamError::Transport(TransportError::Cancelled) => {
                tracing::info!(target: "decoder", "shutdown requested, stopped after {} frames", frames);
                Ok(self.telemetry())
            }
            StreamError::Transport(TransportError::ConnectionClosed { received, expected }) => {
                tracing::warn!(
                    target: "decoder",
                    "peer closed the stream after {} frames ({}/{} bytes of the pending read)",
                    frames, received, expected
                );
                Err(stop)
            }
            other => {
                tracing::debug!(target: "decoder", "decode loop failed after {} frames: {}", frames, other);
                Err(other)
            }
        }
    }
}
