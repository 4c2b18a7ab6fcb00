//! framestream-cli
//!
//! Shared pieces of the `framestream` client and the `framestream-serve`
//! synthetic source: logging setup, signal wiring, record output.

pub mod logging;
pub mod output;
pub mod signals;
pub mod synth;

/// Process exit codes.
pub mod exit {
    pub const OK: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const PEER_CLOSED: u8 = 3;
}
