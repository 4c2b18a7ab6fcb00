//! framestream: connect to a frame source and print one record per frame.
//!
//! Exit status: 0 on interrupt, 1 on connect/I/O failure, 2 on usage or
//! config errors, 3 when the peer closes the stream.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam::channel::{self, RecvTimeoutError};

use framestream_cli::output::{OutputFormat, RecordWriter};
use framestream_cli::{exit, logging, signals};
use framestream_core::prelude::*;
use framestream_core::transport::ConnectError;

#[derive(Debug, Parser)]
#[command(name = "framestream", version)]
#[command(about = "Decode a fixed-size framed telemetry stream from a TCP source", long_about = None)]
struct Cli {
    /// Host name or address of the frame source
    host: String,

    /// TCP port of the frame source
    port: u16,

    /// JSON client config (layout, timeouts, queue depth)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-address connect timeout in milliseconds
    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    /// Total frame length in bytes, header included
    #[arg(long)]
    packet_len: Option<usize>,

    /// Record format on stdout
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Print the telemetry snapshot as JSON to stderr on exit
    #[arg(long)]
    stats: bool,

    /// Disable Nagle's algorithm on the socket
    #[arg(long)]
    nodelay: bool,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(target: "client", "{:#}", e);
            return ExitCode::from(exit::USAGE);
        }
    };

    let cancel = CancelToken::new();
    if let Err(e) = signals::install(cancel.clone()) {
        tracing::error!(target: "client", "cannot install signal handler: {}", e);
        return ExitCode::from(exit::FAILURE);
    }

    let target = ConnectionTarget::new(cli.host, cli.port);
    let (result, snapshot) = stream(&target, &config, cancel.clone(), cli.format);

    if cli.stats {
        if let Some(snapshot) = snapshot {
            match snapshot.to_json() {
                Ok(json) => eprintln!("{json}"),
                Err(e) => tracing::warn!(target: "client", "cannot serialize telemetry: {}", e),
            }
        }
    }

    ExitCode::from(exit_code(result, &cancel))
}

/// Config file first, then command-line overrides, then validation.
fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(ms) = cli.connect_timeout_ms {
        config.connect_timeout_ms = Some(ms);
    }
    if let Some(len) = cli.packet_len {
        config.layout = FrameLayout { packet_len: len };
    }
    config.nodelay |= cli.nodelay;
    config.validate().context("invalid client configuration")?;
    Ok(config)
}

/// Connect, then run the decoder on its own thread while this thread writes
/// records. Returns the stop reason and, once connected, the telemetry.
fn stream(
    target: &ConnectionTarget,
    config: &ClientConfig,
    cancel: CancelToken,
    format: OutputFormat,
) -> (Result<(), StreamError>, Option<TelemetrySnapshot>) {
    tracing::info!(target: "client", "connecting to {}", target);
    let connect = {
        let (target, config, cancel) = (target.clone(), config.clone(), cancel.clone());
        move || FrameDecoder::connect(&target, &config, cancel)
    };
    let mut decoder = match await_connect(connect, &target.to_string(), &cancel, config.poll_interval()) {
        Ok(decoder) => decoder,
        Err(e) => return (Err(e), None),
    };

    let (mut sink, rx) = ChannelSink::bounded(config.queue_depth);
    let stdout = io::stdout();
    let mut records = RecordWriter::new(stdout.lock(), format);

    let (result, snapshot) = thread::scope(|scope| {
        let decode = scope.spawn(move || {
            let result = decoder.run(&mut sink).map(|_| ());
            (result, decoder.telemetry())
        });

        for frame in rx.iter() {
            if let Err(e) = records.write_frame(&frame) {
                tracing::error!(target: "client", "cannot write record: {}", e);
                cancel.cancel();
                break;
            }
        }
        drop(rx);

        match decode.join() {
            Ok(out) => out,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    });

    (result, Some(snapshot))
}

/// Run `connect` on a detached thread and wait for it, checking `cancel`
/// every `poll`. A single connect attempt cannot be interrupted, so on
/// cancellation the attempt is abandoned rather than awaited.
fn await_connect<T, F>(connect: F, label: &str, cancel: &CancelToken, poll: Duration) -> Result<T, StreamError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StreamError> + Send + 'static,
{
    let (tx, rx) = channel::bounded(1);
    let handle = thread::spawn(move || {
        // Receiver gone means we were cancelled; drop whatever we got.
        let _ = tx.send(connect());
    });

    loop {
        match rx.recv_timeout(poll) {
            Ok(result) => return result,
            Err(RecvTimeoutError::Timeout) if cancel.is_cancelled() => {
                tracing::debug!(target: "client", "abandoning connect to {}", label);
                return Err(ConnectError::Cancelled { target: label.to_owned() }.into());
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => match handle.join() {
                Err(panic) => std::panic::resume_unwind(panic),
                Ok(()) => unreachable!("connect thread exited without sending"),
            },
        }
    }
}

fn exit_code(result: Result<(), StreamError>, cancel: &CancelToken) -> u8 {
    let err = match result {
        Ok(()) => return exit::OK,
        Err(e) => e,
    };
    match err.class() {
        ErrorClass::Cancelled => exit::OK,
        // Already reported by the decode loop.
        ErrorClass::Closed => exit::PEER_CLOSED,
        ErrorClass::Usage => {
            tracing::error!(target: "client", "{}", err);
            exit::USAGE
        }
        // The consumer side broke because we were shutting down anyway.
        ErrorClass::Sink if cancel.is_cancelled() => exit::OK,
        // Interrupted while still connecting.
        ErrorClass::Connect if cancel.is_cancelled() => exit::OK,
        ErrorClass::Connect | ErrorClass::Io | ErrorClass::Sink => {
            tracing::error!(target: "client", "{}", err);
            exit::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framestream_core::transport::TransportError;

    #[test]
    fn cli_overrides_defaults() {
        let cli = Cli::parse_from(["framestream", "gw", "5452", "--packet-len", "1036", "--nodelay"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.layout.payload_len(), 1024);
        assert!(config.nodelay);
        assert_eq!(cli.format, OutputFormat::Tsv);
    }

    #[test]
    fn bad_layout_is_rejected_before_connecting() {
        let cli = Cli::parse_from(["framestream", "gw", "5452", "--packet-len", "13"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn non_numeric_port_is_usage_error() {
        assert!(Cli::try_parse_from(["framestream", "gw", "http"]).is_err());
        assert!(Cli::try_parse_from(["framestream", "gw"]).is_err());
    }

    #[test]
    fn exit_codes_follow_stop_reason() {
        let cancel = CancelToken::new();
        assert_eq!(exit_code(Ok(()), &cancel), exit::OK);
        assert_eq!(exit_code(Err(TransportError::Cancelled.into()), &cancel), exit::OK);

        let closed = TransportError::ConnectionClosed { received: 0, expected: 12 };
        assert_eq!(exit_code(Err(closed.into()), &cancel), exit::PEER_CLOSED);

        let reset = TransportError::Io(io::ErrorKind::ConnectionReset.into());
        assert_eq!(exit_code(Err(reset.into()), &cancel), exit::FAILURE);

        let sink = StreamError::Sink(SinkError::Disconnected);
        assert_eq!(exit_code(Err(sink), &cancel), exit::FAILURE);
        cancel.cancel();
        assert_eq!(exit_code(Err(StreamError::Sink(SinkError::Disconnected)), &cancel), exit::OK);
    }

    #[test]
    fn await_connect_returns_the_connect_result() {
        let cancel = CancelToken::new();
        let got = await_connect(|| Ok(7), "gw:5452", &cancel, Duration::from_millis(10));
        assert_eq!(got.unwrap(), 7);

        let refused = await_connect::<u8, _>(
            || Err(StreamError::Transport(TransportError::Cancelled)),
            "gw:5452",
            &cancel,
            Duration::from_millis(10),
        );
        assert!(refused.is_err());
    }

    #[test]
    fn interrupt_abandons_a_hung_connect() {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            token.cancel();
        });

        let start = std::time::Instant::now();
        let hung = || {
            thread::sleep(Duration::from_secs(10));
            Ok(())
        };
        let err = await_connect(hung, "10.255.255.1:5452", &cancel, Duration::from_millis(10)).unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(err.class(), ErrorClass::Cancelled);
        assert_eq!(exit_code(Err(err), &cancel), exit::OK);
    }
}
