use std::io::Write;

use crate::config::FrameLayout;
use crate::framing::types::{Frame, FrameError, Payload};
use crate::headers::{encode_header_le, FrameHeader};

/// Encode one frame into its wire form.
///
/// Layout:
///
/// ```text
/// [ header (12) ]
/// [ payload (layout.payload_len()) ]
/// ```
pub fn encode_frame(
    header: &FrameHeader,
    payload: &Payload,
    layout: &FrameLayout,
) -> Result<Vec<u8>, FrameError> {
    if payload.byte_len() != layout.payload_len() {
        return Err(FrameError::LengthMismatch {
            expected: layout.payload_len(),
            actual: payload.byte_len(),
        });
    }

    let mut out = Vec::with_capacity(layout.packet_len);
    out.extend_from_slice(&encode_header_le(header));
    out.extend_from_slice(payload.as_bytes());

    debug_assert_eq!(out.len(), layout.packet_len);
    Ok(out)
}

/// Writes whole frames to any `Write`. The sending side of the protocol.
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    out: W,
    layout: FrameLayout,
    frames_written: u64,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W, layout: FrameLayout) -> Self {
        Self { out, layout, frames_written: 0 }
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<(), FrameError> {
        let wire = encode_frame(&frame.header, &frame.payload, &self.layout)?;
        self.out.write_all(&wire)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Build and write a frame from parts.
    pub fn write_parts(&mut self, header: FrameHeader, samples: &[i16]) -> Result<(), FrameError> {
        self.write_frame(&Frame::new(header, Payload::from_samples(samples)))
    }

    pub fn flush(&mut self) -> Result<(), FrameError> {
        self.out.flush()?;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
