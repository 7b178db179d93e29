//! Control plane module - built-in handlers for the reserved table.
//!
//! Every engine answers the shared command table out of the box:
//!
//! 1. Handshake: readiness probes, acknowledgment and comment sinks,
//!    peer error notices, and the unknown-command fallback
//! 2. Measurements: the on/off gate, source resets, and per-channel
//!    value requests
//! 3. Typed value echoes for interoperability checks
//! 4. Series transfers, one-shot and counted
//!
//! [`install`] registers the whole plane against a layout; user handlers
//! live above [`CommandLayout::first_free_id`] unless a registration
//! explicitly opts into overriding a reserved slot.
//!
//! [`CommandLayout::first_free_id`]: crate::protocol::CommandLayout::first_free_id

mod handshake;
mod measure;
mod series;
mod values;

pub use values::PingKind;

use crate::handler::HandlerRegistry;
use crate::protocol::{CommandLayout, ControlSlot};

/// Register the built-in handlers for every reserved identifier that
/// has inbound behavior.
pub(crate) fn install(registry: &mut HandlerRegistry, layout: &CommandLayout) {
    registry.register(layout.id(ControlSlot::CommError), handshake::on_peer_error);
    registry.register(layout.id(ControlSlot::Comment), handshake::on_comment);
    registry.register(layout.id(ControlSlot::Acknowledge), handshake::on_acknowledge);
    registry.register(
        layout.id(ControlSlot::AreYouReady),
        handshake::on_are_you_ready,
    );
    registry.register(layout.id(ControlSlot::Error), handshake::on_peer_error);
    registry.register(
        layout.id(ControlSlot::AskUsIfReady),
        handshake::on_ask_us_if_ready,
    );
    registry.set_fallback(handshake::on_unknown);

    registry.register(layout.id(ControlSlot::TurnOnMeasurements), measure::on_turn_on);
    registry.register(
        layout.id(ControlSlot::TurnOffMeasurements),
        measure::on_turn_off,
    );
    registry.register(layout.id(ControlSlot::ResetMeasurements), measure::on_reset);
    for index in 0..layout.channel_count() {
        if let Some(id) = layout.channel_id(index) {
            registry.register(id, measure::ChannelRequest { index });
        }
    }

    registry.register(layout.id(ControlSlot::ValuePing), values::on_value_ping);
    registry.register(
        layout.id(ControlSlot::MultiValuePing),
        values::on_multi_value_ping,
    );

    registry.register(layout.id(ControlSlot::RequestReset), series::on_request_reset);
    registry.register(layout.id(ControlSlot::RequestSeries), series::on_request_series);
    registry.register(
        layout.id(ControlSlot::PrepareSendSeries),
        series::on_prepare_send_series,
    );
    registry.register(layout.id(ControlSlot::SendSeries), series::on_send_series);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_covers_inbound_slots_only() {
        let layout = CommandLayout::new(2);
        let mut registry = HandlerRegistry::new();
        install(&mut registry, &layout);

        // Six head slots, on/off/reset, two channel requests, two
        // pings, four series commands.
        assert_eq!(registry.len(), 17);
        assert!(registry.fallback().is_some());

        assert!(registry.is_registered(layout.id(ControlSlot::AreYouReady)));
        assert!(registry.is_registered(layout.channel_id(0).unwrap()));
        assert!(registry.is_registered(layout.channel_id(1).unwrap()));

        // Outbound-only slots route through the fallback instead.
        assert!(!registry.is_registered(layout.id(ControlSlot::ValuePong)));
        assert!(!registry.is_registered(layout.id(ControlSlot::AckSendSeries)));
        assert!(!registry.is_registered(layout.id(ControlSlot::YouAreReady)));
    }
}
