//! Streaming transfer session.
//!
//! One engine owns exactly one session. A `Prepare` arms it with an
//! expected length; each counted `Send` frame bumps the count, and the
//! frame that reaches the expected length completes the session. `Reset`
//! zeroes the count from any state. The session itself never touches the
//! wire; handlers translate its outcomes into acknowledgment frames.

use tracing::debug;

/// Session state: idle, or armed with an expected length and the count
/// so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transfer in progress.
    Idle,
    /// A transfer was prepared and items are being counted.
    Armed {
        /// Expected number of item frames.
        length: u16,
        /// Item frames seen since the prepare.
        count: u16,
    },
}

/// What one counted item frame meant to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The item was counted; more are expected.
    Counting,
    /// The item completed the transfer; acknowledge exactly once.
    Acknowledged,
    /// No transfer is armed; the item is absorbed silently.
    Ignored,
}

/// The mutable `{expected length, received count}` pair governing one
/// streaming transfer.
#[derive(Debug, Default)]
pub struct TransferSession {
    state: SessionState,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

impl TransferSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Arm the session: expect `length` item frames, count from zero.
    ///
    /// Re-arming an armed session discards its progress.
    pub fn prepare(&mut self, length: u16) {
        debug!(length, "transfer session armed");
        self.state = SessionState::Armed { length, count: 0 };
    }

    /// Record one counted item frame. Payloads are not inspected; the
    /// contract counts frames only.
    pub fn record_send(&mut self) -> SendOutcome {
        match self.state {
            SessionState::Idle => SendOutcome::Ignored,
            SessionState::Armed { length, count } => {
                let count = count.saturating_add(1);
                if count == length {
                    debug!(length, "transfer session complete");
                    self.state = SessionState::Idle;
                    SendOutcome::Acknowledged
                } else {
                    self.state = SessionState::Armed { length, count };
                    SendOutcome::Counting
                }
            }
        }
    }

    /// Zero the count without touching the expected length. Works from
    /// any state; an idle session stays idle.
    pub fn reset(&mut self) {
        debug!("transfer session reset");
        if let SessionState::Armed { length, .. } = self.state {
            self.state = SessionState::Armed { length, count: 0 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let session = TransferSession::new();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_send_while_idle_is_ignored() {
        let mut session = TransferSession::new();
        assert_eq!(session.record_send(), SendOutcome::Ignored);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_full_transfer_acknowledges_once() {
        let mut session = TransferSession::new();
        session.prepare(5);

        for _ in 0..4 {
            assert_eq!(session.record_send(), SendOutcome::Counting);
        }
        assert_eq!(session.record_send(), SendOutcome::Acknowledged);
        assert_eq!(session.state(), SessionState::Idle);

        // Extras after completion are absorbed.
        assert_eq!(session.record_send(), SendOutcome::Ignored);
    }

    #[test]
    fn test_short_transfer_never_acknowledges() {
        let mut session = TransferSession::new();
        session.prepare(5);

        for _ in 0..4 {
            assert_eq!(session.record_send(), SendOutcome::Counting);
        }
        assert_eq!(
            session.state(),
            SessionState::Armed {
                length: 5,
                count: 4
            }
        );
    }

    #[test]
    fn test_reset_zeroes_count_keeps_length() {
        let mut session = TransferSession::new();
        session.prepare(3);
        session.record_send();
        session.record_send();

        session.reset();
        assert_eq!(
            session.state(),
            SessionState::Armed {
                length: 3,
                count: 0
            }
        );

        // The full length is expected again after the reset.
        assert_eq!(session.record_send(), SendOutcome::Counting);
        assert_eq!(session.record_send(), SendOutcome::Counting);
        assert_eq!(session.record_send(), SendOutcome::Acknowledged);
    }

    #[test]
    fn test_reset_while_idle_stays_idle() {
        let mut session = TransferSession::new();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_prepare_rearms_discarding_progress() {
        let mut session = TransferSession::new();
        session.prepare(2);
        session.record_send();

        session.prepare(1);
        assert_eq!(session.record_send(), SendOutcome::Acknowledged);
    }

    #[test]
    fn test_prepare_zero_never_completes() {
        let mut session = TransferSession::new();
        session.prepare(0);

        // Count can only move upward past zero, so no Send completes it.
        assert_eq!(session.record_send(), SendOutcome::Counting);
        assert_eq!(session.record_send(), SendOutcome::Counting);
    }
}
