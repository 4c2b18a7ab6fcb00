//! Wire framing.
//!
//! Responsibilities:
//! - Frame and payload types
//! - The two-phase decode loop
//! - Encoding frames for the sending side
//! - Handing frames to sinks
//!
//! Non-responsibilities:
//! - Sockets and cancellation (see `transport`)
//! - Interpreting sample data

pub mod types;
pub mod encode;
pub mod decode;
pub mod sink;

pub use types::{Frame, FrameError, Payload};
pub use encode::{encode_frame, FrameWriter};
pub use decode::{decode_frame, DecoderState, FrameDecoder};
pub use sink::{from_fn, ChannelSink, FnSink, FrameSink, SinkError};
