//! Transport module - byte-stream endpoints the engine drives.
//!
//! Provides abstraction over:
//! - In-memory loopback pairs (tests, embedding)
//! - Hardware serial ports via the `serialport` crate
//!
//! The engine borrows the transport for reads and writes; it never takes
//! over scheduling. Reads are non-blocking: `read_available` returns
//! whatever has arrived, possibly nothing.

mod loopback;
mod serial;

pub use loopback::LoopbackTransport;
pub use serial::{SerialTransport, DEFAULT_BAUD};

use crate::error::Result;

/// A byte-oriented, non-blocking duplex endpoint.
pub trait Transport: Send {
    /// Read up to `buf.len()` already-available bytes.
    ///
    /// Returns the number of bytes read; `0` means nothing is pending.
    /// Must not block waiting for data.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `bytes` to the peer.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;
}
