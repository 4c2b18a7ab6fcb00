//! Frame records on stdout.
//!
//! `tsv`: `pkt_id<TAB>unixtime<TAB>ms`, one line per frame.
//! `json`: one object per line with the header fields and the sample count.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use framestream_core::framing::{Frame, FrameSink, SinkError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
}

#[derive(Serialize)]
struct JsonRecord {
    pkt_id: i32,
    unixtime: u32,
    ms: u16,
    device_id: u16,
    samples: usize,
}

pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Write one record and flush, so a downstream pipe sees frames as they
    /// arrive.
    pub fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let h = &frame.header;
        match self.format {
            OutputFormat::Tsv => writeln!(self.out, "{}\t{}\t{}", h.pkt_id, h.unixtime, h.ms)?,
            OutputFormat::Json => {
                let record = JsonRecord {
                    pkt_id: h.pkt_id,
                    unixtime: h.unixtime,
                    ms: h.ms,
                    device_id: h.device_id,
                    samples: frame.payload.sample_count(),
                };
                serde_json::to_writer(&mut self.out, &record)?;
                self.out.write_all(b"\n")?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Lets the decoder write records directly when no consumer thread is needed.
impl<W: Write> FrameSink for RecordWriter<W> {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.write_frame(&frame).map_err(|e| SinkError::Failed(e.to_string()))
    }
}
