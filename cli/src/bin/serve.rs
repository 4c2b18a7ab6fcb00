//! framestream-serve: stream synthetic frames to every client that connects.
//!
//! One thread per client. Runs until interrupted; `--count` bounds the frames
//! each client receives. Client sockets carry a write timeout so a client that
//! stops reading cannot hold up shutdown.

use std::io::{BufWriter, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use framestream_cli::{logging, signals, synth::SyntheticSource};
use framestream_core::config::FrameLayout;
use framestream_core::framing::{FrameError, FrameWriter};
use framestream_core::transport::{CancelToken, CancellableWriter};

const ACCEPT_POLL: Duration = Duration::from_millis(50);
const WRITE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Parser)]
#[command(name = "framestream-serve", version)]
#[command(about = "Serve synthetic framed telemetry over TCP", long_about = None)]
struct Args {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1:5452")]
    bind: String,

    /// Delay between frames sent to one client
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    /// device_id stamped on every header
    #[arg(long, default_value_t = 1)]
    device_id: u16,

    /// Frames per client before closing the connection
    #[arg(long)]
    count: Option<u64>,

    /// Total frame length in bytes, header included
    #[arg(long)]
    packet_len: Option<usize>,

    /// Seed for the sample noise
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let layout = match args.packet_len {
        Some(len) => FrameLayout::new(len).context("invalid --packet-len")?,
        None => FrameLayout::default(),
    };

    let cancel = CancelToken::new();
    signals::install(cancel.clone()).context("installing signal handler")?;

    let listener = TcpListener::bind(&args.bind).with_context(|| format!("binding {}", args.bind))?;
    // Non-blocking accept so an interrupt is noticed between polls.
    listener.set_nonblocking(true)?;
    tracing::info!(target: "serve", "listening on {} ({}-byte frames)", listener.local_addr()?, layout.packet_len);

    thread::scope(|scope| -> anyhow::Result<()> {
        while !cancel.is_cancelled() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false)?;
                    stream.set_write_timeout(Some(WRITE_POLL))?;
                    tracing::info!(target: "serve", "client {} connected", peer);
                    let (args, cancel) = (&args, &cancel);
                    scope.spawn(move || serve_client(stream, peer, layout, args, cancel));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => return Err(e).context("accepting client"),
            }
        }
        tracing::info!(target: "serve", "shutting down");
        Ok(())
    })
}

fn serve_client(stream: TcpStream, peer: SocketAddr, layout: FrameLayout, args: &Args, cancel: &CancelToken) {
    let mut source = SyntheticSource::new(args.device_id, &layout, args.seed);
    let out = CancellableWriter::new(stream, cancel.clone());
    let mut writer = FrameWriter::new(BufWriter::new(out), layout);
    let interval = Duration::from_millis(args.interval_ms);

    let result = (|| -> Result<(), FrameError> {
        while !cancel.is_cancelled() {
            if args.count.is_some_and(|n| writer.frames_written() >= n) {
                break;
            }
            writer.write_frame(&source.next_frame())?;
            writer.flush()?;
            thread::sleep(interval);
        }
        Ok(())
    })();

    match result {
        Ok(()) => tracing::info!(target: "serve", "client {} done after {} frames", peer, writer.frames_written()),
        Err(_) if cancel.is_cancelled() => {
            tracing::info!(target: "serve", "client {} stopped for shutdown after {} frames", peer, writer.frames_written())
        }
        Err(e) => tracing::info!(target: "serve", "client {} dropped after {} frames: {}", peer, writer.frames_written(), e),
    }
}
