//! framing/sink.rs
//!
//! Consumers of decoded frames. The decoder hands each frame over by value
//! and keeps nothing.

use crossbeam::channel::{Receiver, Sender};

use crate::framing::types::Frame;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Receiving side of a channel sink is gone.
    #[error("frame consumer disconnected")]
    Disconnected,

    /// Sink-specific failure (e.g. the output writer broke).
    #[error("sink failed: {0}")]
    Failed(String),
}

pub trait FrameSink {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError>;
}

impl<K: FrameSink + ?Sized> FrameSink for &mut K {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        (**self).accept(frame)
    }
}

impl<K: FrameSink + ?Sized> FrameSink for Box<K> {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        (**self).accept(frame)
    }
}

/// Collects every frame. Mostly for tests and batch use.
impl FrameSink for Vec<Frame> {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.push(frame);
        Ok(())
    }
}

/// Closure adapter, see [`from_fn`].
pub struct FnSink<F>(F);

impl<F> FrameSink for FnSink<F>
where
    F: FnMut(Frame) -> Result<(), SinkError>,
{
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        (self.0)(frame)
    }
}

pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(Frame) -> Result<(), SinkError>,
{
    FnSink(f)
}

/// Forwards frames over a `crossbeam` channel so the decode loop and the
/// consumer can live on different threads. A bounded channel blocks the
/// decoder while the consumer is behind.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Frame>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Frame>) -> Self {
        Self { tx }
    }

    pub fn bounded(depth: usize) -> (Self, Receiver<Frame>) {
        let (tx, rx) = crossbeam::channel::bounded(depth);
        (Self { tx }, rx)
    }
}

impl FrameSink for ChannelSink {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.tx.send(frame).map_err(|_| SinkError::Disconnected)
    }
}
