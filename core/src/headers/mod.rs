//! headers/mod.rs
//! The 12-byte frame header.
//!
//! Layout (little-endian):
//!
//! ```text
//! [ device_id (2) ][ unixtime (4) ][ ms (2) ][ pkt_id (4, signed) ]
//! ```

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
