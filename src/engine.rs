//! Engine builder and poll loop.
//!
//! The [`EngineBuilder`] provides a fluent API for declaring channels,
//! registering handlers, and building the engine. The [`Engine`] owns
//! one transport and drives everything from [`pump`](Engine::pump):
//! read whatever the transport has, then tokenize and dispatch frame by
//! frame. The engine volunteers nothing on its own; outbound frames
//! come from handler replies and explicit sends.
//!
//! There is exactly one thread of control. Handlers run inside `pump`,
//! and the synchronous exchange keeps dispatching unrelated frames
//! while it waits, so a handler blocking on an acknowledgment never
//! stalls the rest of the link.
//!
//! # Example
//!
//! ```ignore
//! use cmdwire::{Engine, LoopbackTransport};
//!
//! let (side, peer) = LoopbackTransport::pair();
//! let mut engine = Engine::builder()
//!     .transport(side)
//!     .handle(25, |ctx: &mut cmdwire::Context| {
//!         let value = ctx.read_i16()?;
//!         let reply = ctx.frame(26).arg_i16(value);
//!         ctx.reply(reply)
//!     })
//!     .build()?;
//!
//! loop {
//!     engine.pump()?;
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, warn};

use crate::channels::{ChannelBank, ValueSource};
use crate::clock::{Clock, SystemClock};
use crate::control;
use crate::error::{Error, Result};
use crate::handler::{CommandHandler, Context, HandlerRegistry};
use crate::options::{ChannelConfig, EngineOptions};
use crate::protocol::{CommandLayout, ControlSlot, Frame, OutboundFrame, Punctuation, Tokenizer};
use crate::session::TransferSession;
use crate::transport::Transport;

/// Bytes requested from the transport per read.
const READ_CHUNK: usize = 256;

/// Builder for configuring and creating an [`Engine`].
pub struct EngineBuilder {
    options: EngineOptions,
    transport: Option<Box<dyn Transport>>,
    clock: Box<dyn Clock>,
    sources: Vec<Box<dyn ValueSource>>,
    handlers: Vec<(u16, Arc<dyn CommandHandler>, bool)>,
    fallback: Option<Arc<dyn CommandHandler>>,
}

impl EngineBuilder {
    /// Create a builder with default options and a system clock.
    pub fn new() -> Self {
        Self {
            options: EngineOptions::default(),
            transport: None,
            clock: Box::new(SystemClock::new()),
            sources: Vec::new(),
            handlers: Vec::new(),
            fallback: None,
        }
    }

    /// Replace the whole option set.
    ///
    /// Channels already declared through [`channel`](Self::channel) are
    /// replaced too; pair this with [`source`](Self::source) for every
    /// channel the options declare.
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the transport carrying the link.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Replace the clock. Tests pass a manual clock here.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Declare a channel and its value source in one step.
    ///
    /// Channel identifiers follow declaration order.
    pub fn channel(mut self, config: ChannelConfig, source: impl ValueSource + 'static) -> Self {
        self.options.channels.push(config);
        self.sources.push(Box::new(source));
        self
    }

    /// Supply the source for the next channel the options declare.
    ///
    /// Sources pair with declared channels in order; the counts must
    /// match at build time.
    pub fn source(mut self, source: impl ValueSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Register a handler for a user command.
    ///
    /// The identifier must lie at or above the layout's first free
    /// identifier; build fails otherwise.
    pub fn handle(mut self, command_id: u16, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.push((command_id, Arc::new(handler), false));
        self
    }

    /// Register a handler for a reserved identifier, replacing the
    /// built-in behavior or observing an outbound-only slot.
    pub fn handle_reserved(
        mut self,
        command_id: u16,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        self.handlers.push((command_id, Arc::new(handler), true));
        self
    }

    /// Replace the fallback invoked for unroutable frames.
    pub fn default_handler(mut self, handler: impl CommandHandler + 'static) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<Engine> {
        self.options.validate()?;

        let declared = self.options.channels.len();
        if self.sources.len() != declared {
            return Err(Error::InvalidOptions(format!(
                "{declared} channels declared but {} sources supplied",
                self.sources.len()
            )));
        }
        let transport = self
            .transport
            .ok_or_else(|| Error::InvalidOptions("no transport configured".into()))?;

        let layout = CommandLayout::new(declared as u16);
        let mut registry = HandlerRegistry::new();
        control::install(&mut registry, &layout);

        for (command_id, handler, reserved_ok) in self.handlers {
            if !reserved_ok {
                layout.check_registrable(command_id)?;
            }
            registry.register_shared(command_id, handler);
        }
        if let Some(handler) = self.fallback {
            registry.set_fallback_shared(handler);
        }

        let specs = self
            .options
            .channels
            .iter()
            .zip(self.sources)
            .map(|(config, source)| (config.name.clone(), config.kind, source))
            .collect();

        let punct = self.options.punctuation();
        Ok(Engine {
            transport,
            clock: self.clock,
            tokenizer: Tokenizer::with_max_frame_len(punct, self.options.max_frame_len),
            inbox: BytesMut::new(),
            registry,
            session: TransferSession::new(),
            channels: ChannelBank::new(specs),
            layout,
            punct,
            options: self.options,
            waiting: false,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A protocol engine bound to one transport.
pub struct Engine {
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    tokenizer: Tokenizer,
    /// Bytes read from the transport but not yet tokenized.
    inbox: BytesMut,
    registry: HandlerRegistry,
    session: TransferSession,
    channels: ChannelBank,
    layout: CommandLayout,
    punct: Punctuation,
    options: EngineOptions,
    /// True while a synchronous exchange is in flight.
    waiting: bool,
}

impl Engine {
    /// Create a new engine builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The deployment's identifier table.
    pub fn layout(&self) -> &CommandLayout {
        &self.layout
    }

    /// The engine's configuration.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The streaming transfer session.
    pub fn session_mut(&mut self) -> &mut TransferSession {
        &mut self.session
    }

    /// The measurement channel bank.
    pub fn channels_mut(&mut self) -> &mut ChannelBank {
        &mut self.channels
    }

    /// Start a frame for an arbitrary identifier, carrying this link's
    /// punctuation.
    pub fn frame(&self, command_id: u16) -> OutboundFrame {
        OutboundFrame::new(command_id, self.punct)
    }

    /// Start a frame for a layout slot.
    pub fn control_frame(&self, slot: ControlSlot) -> OutboundFrame {
        self.frame(self.layout.id(slot))
    }

    /// Encode and write one frame.
    pub fn send(&mut self, frame: OutboundFrame) -> Result<()> {
        let bytes = frame.encode();
        self.transport.write_all(&bytes)
    }

    /// Run one engine cycle: read, then dispatch.
    ///
    /// Call this from the application's loop. Every completed inbound
    /// frame is dispatched before the byte after it is examined, so
    /// replies a handler sends interleave with the peer's input in
    /// arrival order.
    pub fn pump(&mut self) -> Result<()> {
        self.fill_inbox()?;
        self.drain_inbox(None)?;
        Ok(())
    }

    /// Send `request` and wait for a frame carrying `expected_ack`.
    ///
    /// Returns `Ok(true)` when the acknowledgment arrives within
    /// `timeout_ms`, `Ok(false)` on timeout. The acknowledgment frame
    /// itself is consumed; every other frame arriving in the meantime
    /// is dispatched normally. A second exchange started while one is
    /// in flight fails with [`Error::ExchangeBusy`].
    pub fn ask_and_wait(
        &mut self,
        request: OutboundFrame,
        expected_ack: u16,
        timeout_ms: u64,
    ) -> Result<bool> {
        if self.waiting {
            return Err(Error::ExchangeBusy);
        }
        self.send(request)?;

        self.waiting = true;
        let outcome = self.wait_for(expected_ack, timeout_ms);
        self.waiting = false;
        outcome
    }

    fn wait_for(&mut self, expected_ack: u16, timeout_ms: u64) -> Result<bool> {
        let deadline = self.clock.now_ms().saturating_add(timeout_ms);
        loop {
            self.fill_inbox()?;
            if self.drain_inbox(Some(expected_ack))? {
                return Ok(true);
            }
            if self.clock.now_ms() >= deadline {
                debug!(expected_ack, timeout_ms, "exchange timed out");
                return Ok(false);
            }
            self.clock
                .park(Duration::from_millis(self.options.poll_interval_ms));
        }
    }

    /// Move everything the transport has into the inbox.
    fn fill_inbox(&mut self) -> Result<()> {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = self.transport.read_available(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            self.inbox.extend_from_slice(&buf[..n]);
        }
    }

    /// Tokenize and dispatch inbox bytes one at a time.
    ///
    /// With an `interest`, the first completed frame carrying that
    /// identifier is consumed and `Ok(true)` returned, leaving the rest
    /// of the inbox for later; every other frame dispatches as usual.
    fn drain_inbox(&mut self, interest: Option<u16>) -> Result<bool> {
        while !self.inbox.is_empty() {
            let byte = self.inbox.split_to(1)[0];
            let Some(frame) = self.tokenizer.accept(byte) else {
                continue;
            };
            if let (Some(expected), Some(id)) = (interest, frame.command_id()) {
                if id == expected {
                    debug!(command = id, "exchange acknowledged");
                    return Ok(true);
                }
            }
            self.dispatch(frame)?;
        }
        Ok(false)
    }

    /// Route one frame to its handler, or to the fallback.
    ///
    /// A handler rejecting its arguments is answered with an error
    /// frame and the engine moves on; other handler errors propagate.
    fn dispatch(&mut self, frame: Frame) -> Result<()> {
        let (command_id, handler) = match frame.command_id() {
            Some(id) => match self.registry.lookup(id) {
                Some(handler) => (id, Some(handler)),
                None => (id, self.registry.fallback()),
            },
            None => {
                warn!("frame identifier did not parse, routing to fallback");
                (0, self.registry.fallback())
            }
        };
        let Some(handler) = handler else {
            debug!(command = command_id, "frame dropped, no handler or fallback");
            return Ok(());
        };

        debug!(command = command_id, fields = frame.field_count(), "dispatch");
        let mut ctx = Context::new(self, &frame, command_id);
        match handler.handle(&mut ctx) {
            Ok(()) => Ok(()),
            Err(err @ Error::MalformedArgument { .. }) => {
                warn!(command = command_id, %err, "handler rejected arguments");
                let notice = self
                    .control_frame(ControlSlot::Error)
                    .arg_str(&err.to_string());
                self.send(notice)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::channels::ChannelKind;
    use crate::clock::ManualClock;
    use crate::transport::LoopbackTransport;

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

    #[test]
    fn test_build_without_transport_fails() {
        let result = Engine::builder().build();
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_build_rejects_missing_sources() {
        let mut options = EngineOptions::default();
        options.channels.push(ChannelConfig {
            name: "temperature".into(),
            kind: ChannelKind::Measurement,
        });

        let (side, _peer) = LoopbackTransport::pair();
        let result = Engine::builder().options(options).transport(side).build();
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_user_registration_respects_reserved_range() {
        let (side, _peer) = LoopbackTransport::pair();
        let result = Engine::builder()
            .transport(side)
            .handle(23, |_ctx: &mut Context| Ok(()))
            .build();
        assert!(matches!(result, Err(Error::ReservedCommand(23))));

        let (side, _peer) = LoopbackTransport::pair();
        assert!(Engine::builder()
            .transport(side)
            .handle(24, |_ctx: &mut Context| Ok(()))
            .handle_reserved(23, |_ctx: &mut Context| Ok(()))
            .build()
            .is_ok());
    }

    #[test]
    fn test_dispatch_routes_frames_in_arrival_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (side, mut peer) = LoopbackTransport::pair();

        let log_a = Arc::clone(&log);
        let log_b = Arc::clone(&log);
        let mut engine = Engine::builder()
            .transport(side)
            .clock(ManualClock::new())
            .handle(100, move |ctx: &mut Context| {
                let value = ctx.read_i16()?;
                log_a.lock().unwrap().push((ctx.command_id(), value));
                Ok(())
            })
            .handle(101, move |ctx: &mut Context| {
                let value = ctx.read_i16()?;
                log_b.lock().unwrap().push((ctx.command_id(), value));
                Ok(())
            })
            .build()
            .unwrap();

        peer.write_all(b"100,7;101,9;100,1;").unwrap();
        engine.pump().unwrap();

        assert_eq!(*log.lock().unwrap(), vec![(100, 7), (101, 9), (100, 1)]);
    }

    #[test]
    fn test_ask_consumes_ack_and_dispatches_bystanders() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (side, mut peer) = LoopbackTransport::pair();

        let log_handle = Arc::clone(&log);
        let mut engine = Engine::builder()
            .transport(side)
            .clock(ManualClock::new())
            .handle(100, move |ctx: &mut Context| {
                let value = ctx.read_i16()?;
                log_handle.lock().unwrap().push(value);
                Ok(())
            })
            .build()
            .unwrap();

        // A bystander frame, the acknowledgment, then one more frame
        // that must survive the exchange untouched.
        peer.write_all(b"100,1;2,ok;100,2;").unwrap();

        let request = engine.frame(30);
        let acked = engine.ask_and_wait(request, 2, 50).unwrap();
        assert!(acked);
        assert_eq!(*log.lock().unwrap(), vec![1]);
        assert_eq!(collect(&mut peer), b"30;".as_slice());

        engine.pump().unwrap();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_ask_times_out_against_silence() {
        let clock = ManualClock::new();
        let (side, mut peer) = LoopbackTransport::pair();
        let mut engine = Engine::builder()
            .transport(side)
            .clock(clock.clone())
            .build()
            .unwrap();

        let request = engine.frame(30).arg_str("anyone");
        let acked = engine.ask_and_wait(request, 2, 50).unwrap();

        assert!(!acked);
        assert!(clock.now_ms() >= 50);
        assert_eq!(collect(&mut peer), b"30,anyone;".as_slice());
    }

    #[test]
    fn test_nested_exchange_is_rejected_as_busy() {
        let saw_busy = Arc::new(Mutex::new(false));
        let (side, mut peer) = LoopbackTransport::pair();

        let saw = Arc::clone(&saw_busy);
        let mut engine = Engine::builder()
            .transport(side)
            .clock(ManualClock::new())
            .handle(100, move |ctx: &mut Context| {
                let probe = ctx.frame(101);
                let result = ctx.ask_and_wait(probe, 2, 10);
                *saw.lock().unwrap() = matches!(result, Err(Error::ExchangeBusy));
                Ok(())
            })
            .build()
            .unwrap();

        // The handler at 100 runs inside the outer exchange.
        peer.write_all(b"100;2;").unwrap();
        let request = engine.frame(30);
        let acked = engine.ask_and_wait(request, 2, 50).unwrap();

        assert!(acked);
        assert!(*saw_busy.lock().unwrap());
    }

    #[test]
    fn test_malformed_frame_is_discarded_and_engine_recovers() {
        let (side, mut peer) = LoopbackTransport::pair();
        let mut options = EngineOptions::default();
        options.max_frame_len = 8;
        let mut engine = Engine::builder()
            .options(options)
            .transport(side)
            .clock(ManualClock::new())
            .build()
            .unwrap();

        let mut noise = vec![b'x'; 30];
        noise.extend_from_slice(b";3;");
        peer.write_all(&noise).unwrap();
        engine.pump().unwrap();

        let out = collect(&mut peer);
        assert!(out.ends_with(b"2,ready;"));
    }

    #[test]
    fn test_custom_punctuation_end_to_end() {
        let mut options = EngineOptions::default();
        options.field_separator = b'|';
        options.command_separator = b'#';
        options.escape_character = b'\\';

        let (side, mut peer) = LoopbackTransport::pair();
        let mut engine = Engine::builder()
            .options(options)
            .transport(side)
            .clock(ManualClock::new())
            .build()
            .unwrap();

        assert_eq!(engine.frame(8).arg_str("x").encode(), b"8|x#");

        peer.write_all(b"3#").unwrap();
        engine.pump().unwrap();
        assert_eq!(collect(&mut peer), b"2|ready#".as_slice());
    }

    #[test]
    fn test_default_handler_override() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (side, mut peer) = LoopbackTransport::pair();

        let seen_handle = Arc::clone(&seen);
        let mut engine = Engine::builder()
            .transport(side)
            .clock(ManualClock::new())
            .default_handler(move |ctx: &mut Context| {
                seen_handle.lock().unwrap().push(ctx.command_id());
                Ok(())
            })
            .build()
            .unwrap();

        peer.write_all(b"99;404,x;").unwrap();
        engine.pump().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![99, 404]);
        assert_eq!(collect(&mut peer), b"");
    }
}
