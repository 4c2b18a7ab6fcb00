//! Transport layer.
//!
//! Responsibilities:
//! - Resolve and connect to a single remote endpoint
//! - Exact-length blocking reads
//! - Blocking writes that give up on cancellation (sending side)
//! - Cooperative cancellation
//!
//! Non-responsibilities:
//! - Framing
//! - Retry / backoff

pub mod cancel;
pub mod connection;
pub mod error;
pub mod writer;

pub use cancel::CancelToken;
pub use connection::{connect, connect_addrs, ConnectOptions, Connection};
pub use error::{ConnectError, TransportError};
pub use writer::CancellableWriter;
