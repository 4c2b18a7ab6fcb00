use bytes::Bytes;
use byteorder::{ByteOrder, LittleEndian};

use crate::constants::SAMPLE_WIDTH;
use crate::headers::FrameHeader;

/// Opaque payload block: little-endian `i16` samples, never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    bytes: Bytes,
}

impl Payload {
    /// Wrap raw payload bytes. Length must be a whole number of samples.
    pub fn from_bytes(bytes: Bytes) -> Self {
        debug_assert_eq!(bytes.len() % SAMPLE_WIDTH, 0, "payload is not sample aligned");
        Self { bytes }
    }

    /// Encode samples in wire order.
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut buf = vec![0u8; samples.len() * SAMPLE_WIDTH];
        LittleEndian::write_i16_into(samples, &mut buf);
        Self { bytes: Bytes::from(buf) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.bytes.len() / SAMPLE_WIDTH
    }

    pub fn sample(&self, index: usize) -> Option<i16> {
        let off = index.checked_mul(SAMPLE_WIDTH)?;
        self.bytes
            .get(off..off.checked_add(SAMPLE_WIDTH)?)
            .map(LittleEndian::read_i16)
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = i16> + '_ {
        self.bytes.chunks_exact(SAMPLE_WIDTH).map(LittleEndian::read_i16)
    }

    pub fn to_vec(&self) -> Vec<i16> {
        let mut out = vec![0i16; self.sample_count()];
        LittleEndian::read_i16_into(&self.bytes, &mut out);
        out
    }
}

/// One protocol message: decoded header plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Payload,
}

impl Frame {
    pub fn new(header: FrameHeader, payload: Payload) -> Self {
        Self { header, payload }
    }

    #[inline]
    pub fn pkt_id(&self) -> i32 {
        self.header.pkt_id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Wire or payload size disagrees with the configured layout.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Header(#[from] crate::headers::HeaderError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
