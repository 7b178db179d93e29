//! Measurement control and per-channel request handlers.
//!
//! The on/off/reset commands flip and clear the channel bank; each
//! configured channel answers a direct request with its current value.
//! A value frame carries the value as its only argument, in the
//! channel's binary form; which channel it belongs to is implied by the
//! request identifier the peer polled.

use crate::channels::ChannelKind;
use crate::error::Result;
use crate::handler::{CommandHandler, Context};
use crate::protocol::ControlSlot;

/// Open the measurement gate.
pub(super) fn on_turn_on(ctx: &mut Context) -> Result<()> {
    ctx.channels_mut().enable();
    let ack = ctx
        .control_frame(ControlSlot::Acknowledge)
        .arg_str("measurements on");
    ctx.reply(ack)
}

/// Close the measurement gate.
pub(super) fn on_turn_off(ctx: &mut Context) -> Result<()> {
    ctx.channels_mut().disable();
    let ack = ctx
        .control_frame(ControlSlot::Acknowledge)
        .arg_str("measurements off");
    ctx.reply(ack)
}

/// Clear accumulated state in every channel source.
pub(super) fn on_reset(ctx: &mut Context) -> Result<()> {
    ctx.channels_mut().reset();
    let ack = ctx
        .control_frame(ControlSlot::Acknowledge)
        .arg_str("measurements reset");
    ctx.reply(ack)
}

/// Handler answering value requests for one channel.
///
/// One instance is registered per configured channel, under that
/// channel's identifier in the channel block.
pub(super) struct ChannelRequest {
    pub(super) index: u16,
}

impl CommandHandler for ChannelRequest {
    fn handle(&self, ctx: &mut Context<'_>) -> Result<()> {
        let index = usize::from(self.index);
        let Some(kind) = ctx.channels_mut().kind(index) else {
            return Ok(());
        };
        let Some(value) = ctx.channels_mut().sample(index) else {
            return Ok(());
        };

        let frame = match kind {
            ChannelKind::Measurement => ctx
                .control_frame(ControlSlot::FloatValue)
                .bin_f32(value as f32),
            ChannelKind::Status => ctx
                .control_frame(ControlSlot::Int16Value)
                .bin_i16(value as i16),
        };
        ctx.reply(frame)
    }
}
