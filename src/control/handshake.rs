//! Handshake and diagnostic handlers.
//!
//! Covers the head of the identifier table: readiness probes in both
//! directions, acknowledgment and comment sinks, peer error notices, and
//! the fallback for frames nothing else claims.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::handler::Context;
use crate::protocol::ControlSlot;

/// Consume an acknowledgment arriving outside a synchronous exchange.
pub(super) fn on_acknowledge(ctx: &mut Context) -> Result<()> {
    let note = ctx.read_str().unwrap_or("");
    debug!(note, "acknowledge received");
    Ok(())
}

/// Answer a readiness probe.
pub(super) fn on_are_you_ready(ctx: &mut Context) -> Result<()> {
    let reply = ctx.control_frame(ControlSlot::Acknowledge).arg_str("ready");
    ctx.reply(reply)
}

/// Probe the peer's readiness on the asker's behalf.
///
/// Sends a probe and blocks on its acknowledgment, then reports the
/// outcome as a readiness frame carrying 1 or 0. A request arriving
/// while another exchange is already in flight reports 0 without
/// probing; it never aborts that exchange.
pub(super) fn on_ask_us_if_ready(ctx: &mut Context) -> Result<()> {
    let probe = ctx
        .control_frame(ControlSlot::AreYouReady)
        .arg_str("checking peer");
    let ack_id = ctx.layout().id(ControlSlot::Acknowledge);
    let timeout_ms = ctx.options().ask_timeout_ms;

    let ready = match ctx.ask_and_wait(probe, ack_id, timeout_ms) {
        Ok(ready) => ready,
        Err(Error::ExchangeBusy) => {
            warn!("readiness relay requested during an exchange, reporting not ready");
            false
        }
        Err(err) => return Err(err),
    };

    let report = ctx
        .control_frame(ControlSlot::YouAreReady)
        .arg_i16(i16::from(ready));
    ctx.reply(report)
}

/// Log a free-form comment from the peer.
pub(super) fn on_comment(ctx: &mut Context) -> Result<()> {
    let text = ctx.read_str().unwrap_or("");
    info!(text, "comment received");
    Ok(())
}

/// Log an error notice from the peer.
pub(super) fn on_peer_error(ctx: &mut Context) -> Result<()> {
    let detail = ctx.read_str().unwrap_or("");
    warn!(command = ctx.command_id(), detail, "peer reported an error");
    Ok(())
}

/// Fallback for frames whose identifier has no handler.
///
/// Replies with an error notice and a status frame echoing the offending
/// identifier, then carries on; an unroutable frame never stops the
/// engine.
pub(super) fn on_unknown(ctx: &mut Context) -> Result<()> {
    let id = ctx.command_id();
    warn!(command = id, "unroutable command");

    let notice = ctx
        .control_frame(ControlSlot::Error)
        .arg_str("Unknown command");
    ctx.reply(notice)?;

    let status = ctx
        .control_frame(ControlSlot::YouAreReady)
        .arg_str("Unknown command")
        .arg_i32(i32::from(id));
    ctx.reply(status)
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
    fn test_readiness_probe_is_acknowledged() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"3;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"2,ready;");
    }

    #[test]
    fn test_comment_is_consumed_silently() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"1,all systems nominal;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"");
    }

    #[test]
    fn test_peer_error_is_consumed_silently() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"4,something broke;0;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"");
    }

    #[test]
    fn test_unknown_command_gets_two_frame_fallback() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"99,whatever;").unwrap();
        engine.pump().unwrap();

        assert_eq!(
            collect(&mut peer),
            b"4,Unknown command;6,Unknown command,99;".as_slice()
        );
    }

    #[test]
    fn test_unparsable_identifier_falls_back_with_zero() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"bogus;").unwrap();
        engine.pump().unwrap();

        assert_eq!(
            collect(&mut peer),
            b"4,Unknown command;6,Unknown command,0;".as_slice()
        );
    }

    #[test]
    fn test_ask_us_if_ready_reports_success() {
        let (mut engine, mut peer) = engine_and_peer();

        // The acknowledgment is already queued when the probe goes out.
        peer.write_all(b"5;2;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"3,checking peer;6,1;".as_slice());
    }

    #[test]
    fn test_ask_us_if_ready_reports_timeout() {
        let (mut engine, mut peer) = engine_and_peer();

        peer.write_all(b"5;").unwrap();
        engine.pump().unwrap();

        assert_eq!(collect(&mut peer), b"3,checking peer;6,0;".as_slice());
    }

    #[test]
    fn test_relay_request_during_exchange_reports_not_ready() {
        let (mut engine, mut peer) = engine_and_peer();

        // The relay request and the acknowledgment arrive while the
        // engine is inside its own exchange. The relay must report not
        // ready and leave the acknowledgment for the outer wait.
        peer.write_all(b"5;2,ready;").unwrap();

        let request = engine.frame(30);
        let acked = engine.ask_and_wait(request, 2, 50).unwrap();

        assert!(acked);
        assert_eq!(collect(&mut peer), b"30;6,0;".as_slice());
    }
}
