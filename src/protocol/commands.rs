//! Command identifier layout.
//!
//! Both endpoints of a link share one enumerated identifier table; the
//! ordering is an external contract and must match byte for byte. The
//! table has three parts: a fixed head of control commands, one request
//! identifier per configured channel, and a tail whose identifiers shift
//! with the channel count. [`CommandLayout`] computes the table for a
//! deployment so neither side hardcodes the shifted values.
//!
//! With a single channel the table reproduces the classic
//! single-instrument assignment: head `0..=6`, the channel request at
//! `7`, then `TurnOnMeasurements = 8` through `AckSendSeries = 24`.

use crate::error::{Error, Result};

/// Symbolic names for the identifiers every deployment carries.
///
/// Order is meaningful: head slots come first, tail slots follow the
/// channel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSlot {
    /// Communication fault notice.
    CommError,
    /// Free-form text logged by the receiver.
    Comment,
    /// Generic acknowledgment; target of the synchronous exchange.
    Acknowledge,
    /// Readiness probe.
    AreYouReady,
    /// Error-kind diagnostic frame.
    Error,
    /// Ask this endpoint to probe the peer's readiness.
    AskUsIfReady,
    /// Outcome report of a readiness probe.
    YouAreReady,
    /// Open the measurement gate.
    TurnOnMeasurements,
    /// Close the measurement gate.
    TurnOffMeasurements,
    /// Reset channel sources.
    ResetMeasurements,
    /// Binary float value frame.
    FloatValue,
    /// Binary int16 value frame.
    Int16Value,
    /// Interoperability echo request.
    ValuePing,
    /// Interoperability echo reply.
    ValuePong,
    /// Multi-argument binary echo request.
    MultiValuePing,
    /// Multi-argument binary echo reply.
    MultiValuePong,
    /// Reset the transfer session.
    RequestReset,
    /// Acknowledgment of a session reset.
    RequestResetAcknowledge,
    /// One-shot series request.
    RequestSeries,
    /// One item of a one-shot series.
    ReceiveSeries,
    /// Completion marker of a one-shot series.
    DoneReceiveSeries,
    /// Arm the counted transfer session.
    PrepareSendSeries,
    /// One counted item frame.
    SendSeries,
    /// Acknowledgment of a completed counted transfer.
    AckSendSeries,
}

/// Head slots in table order.
const HEAD: [ControlSlot; 7] = [
    ControlSlot::CommError,
    ControlSlot::Comment,
    ControlSlot::Acknowledge,
    ControlSlot::AreYouReady,
    ControlSlot::Error,
    ControlSlot::AskUsIfReady,
    ControlSlot::YouAreReady,
];

/// Tail slots in table order, starting right after the channel block.
const TAIL: [ControlSlot; 17] = [
    ControlSlot::TurnOnMeasurements,
    ControlSlot::TurnOffMeasurements,
    ControlSlot::ResetMeasurements,
    ControlSlot::FloatValue,
    ControlSlot::Int16Value,
    ControlSlot::ValuePing,
    ControlSlot::ValuePong,
    ControlSlot::MultiValuePing,
    ControlSlot::MultiValuePong,
    ControlSlot::RequestReset,
    ControlSlot::RequestResetAcknowledge,
    ControlSlot::RequestSeries,
    ControlSlot::ReceiveSeries,
    ControlSlot::DoneReceiveSeries,
    ControlSlot::PrepareSendSeries,
    ControlSlot::SendSeries,
    ControlSlot::AckSendSeries,
];

/// The identifier table of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLayout {
    channel_count: u16,
}

impl CommandLayout {
    /// Build the table for `channel_count` channels.
    pub fn new(channel_count: u16) -> Self {
        Self { channel_count }
    }

    /// Number of channels in the block.
    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    /// Identifier assigned to `slot`.
    pub fn id(&self, slot: ControlSlot) -> u16 {
        if let Some(pos) = HEAD.iter().position(|s| *s == slot) {
            return pos as u16;
        }
        let pos = TAIL
            .iter()
            .position(|s| *s == slot)
            .expect("every slot is in the head or the tail") as u16;
        HEAD.len() as u16 + self.channel_count + pos
    }

    /// Identifier of the channel request at `index`, if configured.
    pub fn channel_id(&self, index: u16) -> Option<u16> {
        if index < self.channel_count {
            Some(HEAD.len() as u16 + index)
        } else {
            None
        }
    }

    /// Channel index owning `id`, if it falls in the channel block.
    pub fn channel_index(&self, id: u16) -> Option<u16> {
        let start = HEAD.len() as u16;
        if id >= start && id < start + self.channel_count {
            Some(id - start)
        } else {
            None
        }
    }

    /// First identifier past the table, free for user registration.
    pub fn first_free_id(&self) -> u16 {
        HEAD.len() as u16 + self.channel_count + TAIL.len() as u16
    }

    /// True when `id` belongs to the head, channel block, or tail.
    pub fn is_reserved(&self, id: u16) -> bool {
        id < self.first_free_id()
    }

    /// Reject reserved identifiers for user registration.
    pub fn check_registrable(&self, id: u16) -> Result<()> {
        if self.is_reserved(id) {
            Err(Error::ReservedCommand(id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ControlSlot::*;

    #[test]
    fn test_head_identifiers_fixed() {
        for count in [0u16, 1, 4] {
            let layout = CommandLayout::new(count);
            assert_eq!(layout.id(CommError), 0);
            assert_eq!(layout.id(Comment), 1);
            assert_eq!(layout.id(Acknowledge), 2);
            assert_eq!(layout.id(AreYouReady), 3);
            assert_eq!(layout.id(ControlSlot::Error), 4);
            assert_eq!(layout.id(AskUsIfReady), 5);
            assert_eq!(layout.id(YouAreReady), 6);
        }
    }

    #[test]
    fn test_single_channel_matches_classic_table() {
        let layout = CommandLayout::new(1);
        assert_eq!(layout.channel_id(0), Some(7));
        assert_eq!(layout.id(TurnOnMeasurements), 8);
        assert_eq!(layout.id(TurnOffMeasurements), 9);
        assert_eq!(layout.id(ResetMeasurements), 10);
        assert_eq!(layout.id(FloatValue), 11);
        assert_eq!(layout.id(Int16Value), 12);
        assert_eq!(layout.id(ValuePing), 13);
        assert_eq!(layout.id(ValuePong), 14);
        assert_eq!(layout.id(MultiValuePing), 15);
        assert_eq!(layout.id(MultiValuePong), 16);
        assert_eq!(layout.id(RequestReset), 17);
        assert_eq!(layout.id(RequestResetAcknowledge), 18);
        assert_eq!(layout.id(RequestSeries), 19);
        assert_eq!(layout.id(ReceiveSeries), 20);
        assert_eq!(layout.id(DoneReceiveSeries), 21);
        assert_eq!(layout.id(PrepareSendSeries), 22);
        assert_eq!(layout.id(SendSeries), 23);
        assert_eq!(layout.id(AckSendSeries), 24);
        assert_eq!(layout.first_free_id(), 25);
    }

    #[test]
    fn test_zero_channels_packs_tail_after_head() {
        let layout = CommandLayout::new(0);
        assert_eq!(layout.channel_id(0), None);
        assert_eq!(layout.id(TurnOnMeasurements), 7);
        assert_eq!(layout.id(AckSendSeries), 23);
        assert_eq!(layout.first_free_id(), 24);
    }

    #[test]
    fn test_four_channel_block() {
        let layout = CommandLayout::new(4);
        assert_eq!(layout.channel_id(0), Some(7));
        assert_eq!(layout.channel_id(3), Some(10));
        assert_eq!(layout.channel_id(4), None);
        assert_eq!(layout.id(TurnOnMeasurements), 11);
        assert_eq!(layout.id(AckSendSeries), 27);

        assert_eq!(layout.channel_index(7), Some(0));
        assert_eq!(layout.channel_index(10), Some(3));
        assert_eq!(layout.channel_index(11), None);
        assert_eq!(layout.channel_index(6), None);
    }

    #[test]
    fn test_reserved_range_boundaries() {
        let layout = CommandLayout::new(1);
        assert!(layout.is_reserved(0));
        assert!(layout.is_reserved(7));
        assert!(layout.is_reserved(24));
        assert!(!layout.is_reserved(25));

        assert!(layout.check_registrable(25).is_ok());
        assert!(matches!(
            layout.check_registrable(2),
            Err(crate::error::Error::ReservedCommand(2))
        ));
    }
}
