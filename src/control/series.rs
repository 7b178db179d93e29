//! Series transfer handlers.
//!
//! Two transfer shapes share this module. The one-shot series streams a
//! computed value sequence to the peer and marks the end with a
//! completion frame. The counted transfer goes the other way: the peer
//! announces how many item frames it will send, the session counts them,
//! and the item that completes the count is acknowledged exactly once.

use crate::error::Result;
use crate::handler::Context;
use crate::protocol::ControlSlot;
use crate::session::SendOutcome;

/// Fraction digits of one-shot series items.
const SERIES_DIGITS: usize = 6;

/// Zero the transfer session's count and acknowledge.
pub(super) fn on_request_reset(ctx: &mut Context) -> Result<()> {
    ctx.session_mut().reset();
    let ack = ctx
        .control_frame(ControlSlot::RequestResetAcknowledge)
        .arg_str("");
    ctx.reply(ack)
}

/// Stream a computed series to the peer, then mark completion.
///
/// The request carries the item count and a base value; item `i` is
/// `i * base` with six fraction digits.
pub(super) fn on_request_series(ctx: &mut Context) -> Result<()> {
    let length = ctx.read_i16()?;
    let base = ctx.read_f32()?;

    for i in 0..length.max(0) {
        let item = ctx
            .control_frame(ControlSlot::ReceiveSeries)
            .arg_f32_prec(f32::from(i) * base, SERIES_DIGITS);
        ctx.reply(item)?;
    }

    let done = ctx
        .control_frame(ControlSlot::DoneReceiveSeries)
        .arg_str("");
    ctx.reply(done)
}

/// Arm the counted transfer session with its expected length.
pub(super) fn on_prepare_send_series(ctx: &mut Context) -> Result<()> {
    let length = ctx.read_i16()?;
    ctx.session_mut().prepare(length.max(0) as u16);
    Ok(())
}

/// Count one item frame; acknowledge the one that completes the
/// transfer. Item payloads are not inspected.
pub(super) fn on_send_series(ctx: &mut Context) -> Result<()> {
    match ctx.session_mut().record_send() {
        SendOutcome::Acknowledged => {
            let ack = ctx.control_frame(ControlSlot::AckSendSeries).arg_str("");
            ctx.reply(ack)
        }
        SendOutcome::Counting | SendOutcome::Ignored => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::transport::{LoopbackTransport, Transport};
    use crate::Engine;

    fn collect(peer: &mut LoopbackTransport) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let n = peer.read_available(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    fn engine_and_peer() -> (Engine, LoopbackTransport) {
        let (side, peer) = LoopbackTransport::pair();
        let engine = Engine::builder()
            .transport(side)
            .clock(ManualClock::new())
            .build()
            .unwrap();
        (engine, peer)
    }

    #[test]
    fn test_one_shot_series_streams_items_then_done() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"18,3,1.5;").unwrap();
        engine.pump().unwrap();

        assert_eq!(
            collect(&mut peer),
            b"19,0.000000;19,1.500000;19,3.000000;20,;".as_slice()
        );
    }

    #[test]
    fn test_one_shot_series_of_zero_items_sends_done_only() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"18,0,2.0;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"20,;".as_slice());
    }

    #[test]
    fn test_counted_transfer_acknowledges_final_item_only() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"21,3;22,a;22,b;").unwrap();
        engine.pump().unwrap();
        assert_eq!(collect(&mut peer), b"");

        peer.write_all(b"22,c;").unwrap();
        engine.pump().unwrap();
        assert_eq!(collect(&mut peer), b"23,;".as_slice());
    }

    #[test]
    fn test_items_without_prepare_are_absorbed() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"22,stray;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"");
    }

    #[test]
    fn test_reset_restores_the_full_expectation() {
        let (mut engine, mut peer) = engine_and_peer();

        // Two of three items, then a reset, then three more.
        peer.write_all(b"21,3;22,a;22,b;16,;22,x;22,y;").unwrap();
        engine.pump().unwrap();
        assert_eq!(collect(&mut peer), b"17,;".as_slice());

        peer.write_all(b"22,z;").unwrap();
        engine.pump().unwrap();
        assert_eq!(collect(&mut peer), b"23,;".as_slice());
    }
}
