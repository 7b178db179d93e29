//! In-memory loopback transport.
//!
//! [`LoopbackTransport::pair`] returns two cross-wired endpoints: what
//! one end writes, the other reads. Tests hand one end to an engine and
//! drive the other directly; two engines can also be wired back to back.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::Transport;
use crate::error::{Error, Result};

type SharedQueue = Arc<Mutex<VecDeque<u8>>>;

/// One end of an in-memory duplex byte stream.
#[derive(Debug)]
pub struct LoopbackTransport {
    /// Bytes the peer wrote, waiting to be read here.
    rx: SharedQueue,
    /// Bytes written here, waiting at the peer.
    tx: SharedQueue,
}

impl LoopbackTransport {
    /// Create two connected endpoints.
    pub fn pair() -> (LoopbackTransport, LoopbackTransport) {
        let a_to_b: SharedQueue = Arc::new(Mutex::new(VecDeque::new()));
        let b_to_a: SharedQueue = Arc::new(Mutex::new(VecDeque::new()));

        let a = LoopbackTransport {
            rx: Arc::clone(&b_to_a),
            tx: Arc::clone(&a_to_b),
        };
        let b = LoopbackTransport {
            rx: a_to_b,
            tx: b_to_a,
        };
        (a, b)
    }

    /// Bytes waiting to be read on this end.
    pub fn pending(&self) -> usize {
        self.rx.lock().map(|q| q.len()).unwrap_or(0)
    }

    fn lock(queue: &SharedQueue) -> Result<std::sync::MutexGuard<'_, VecDeque<u8>>> {
        queue
            .lock()
            .map_err(|_| Error::Io(io::Error::other("loopback queue poisoned")))
    }
}

impl Transport for LoopbackTransport {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut queue = Self::lock(&self.rx)?;
        let mut read = 0;
        while read < buf.len() {
            match queue.pop_front() {
                Some(byte) => {
                    buf[read] = byte;
                    read += 1;
                }
                None => break,
            }
        }
        Ok(read)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut queue = Self::lock(&self.tx)?;
        queue.extend(bytes.iter().copied());
        Ok(())
    }
}
