//! Millisecond clock abstraction.
//!
//! The engine never reads the system time directly; it goes through the
//! [`Clock`] trait so tests can inject a manual clock and drive
//! exchange timeouts deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic millisecond clock used by the synchronous exchange.
pub trait Clock: Send {
    /// Milliseconds elapsed since some fixed origin. Monotonic.
    fn now_ms(&self) -> u64;

    /// Pause the calling thread for roughly `duration`.
    ///
    /// The exchange retry loop calls this between transport polls.
    /// Manual clocks advance their virtual time here instead of sleeping.
    fn park(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn park(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for tests.
///
/// Cloning yields a handle onto the same virtual time, so a test can keep
/// one handle while the engine owns another. `park` advances time instead
/// of sleeping, which lets a timeout elapse without any real waiting.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at zero milliseconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the virtual time by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn park(&self, duration: Duration) {
        self.advance(duration.as_millis() as u64);
    }
}
