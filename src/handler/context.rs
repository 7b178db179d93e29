//! Per-dispatch handler context.
//!
//! A [`Context`] lives for exactly one handler invocation. It couples
//! the positional argument cursor over the inbound frame with mutable
//! access to the engine, so a handler can read its arguments, build and
//! send reply frames, drive the synchronous exchange, and touch the
//! transfer session or the channel bank.
//!
//! # Example
//!
//! ```ignore
//! // Echo an int16 back under a reply identifier.
//! fn on_echo(ctx: &mut Context) -> Result<()> {
//!     let value = ctx.read_i16()?;
//!     let reply = ctx.frame(200).arg_i16(value);
//!     ctx.reply(reply)
//! }
//! ```

use crate::channels::ChannelBank;
use crate::engine::Engine;
use crate::error::Result;
use crate::options::EngineOptions;
use crate::protocol::{ArgReader, CommandLayout, ControlSlot, Frame, OutboundFrame};
use crate::session::TransferSession;

/// Everything a handler may do during one dispatch.
pub struct Context<'a> {
    engine: &'a mut Engine,
    args: ArgReader<'a>,
    command_id: u16,
}

impl<'a> Context<'a> {
    pub(crate) fn new(engine: &'a mut Engine, frame: &'a Frame, command_id: u16) -> Self {
        Self {
            engine,
            args: frame.reader(),
            command_id,
        }
    }

    /// Identifier of the frame being handled.
    ///
    /// For the fallback handler this is the raw identifier that had no
    /// registration, or 0 when field 0 did not parse at all.
    pub fn command_id(&self) -> u16 {
        self.command_id
    }

    /// Number of arguments left to read.
    pub fn remaining_args(&self) -> usize {
        self.args.remaining()
    }

    /// Start a frame for an arbitrary identifier.
    pub fn frame(&self, command_id: u16) -> OutboundFrame {
        self.engine.frame(command_id)
    }

    /// Start a frame for a layout slot.
    pub fn control_frame(&self, slot: ControlSlot) -> OutboundFrame {
        self.engine.control_frame(slot)
    }

    /// Send a frame to the peer.
    pub fn reply(&mut self, frame: OutboundFrame) -> Result<()> {
        self.engine.send(frame)
    }

    /// Send a request and wait for the matching acknowledgment.
    ///
    /// See [`Engine::ask_and_wait`]. Unrelated frames arriving during
    /// the wait are dispatched normally, so this call can re-enter
    /// other handlers before it returns.
    ///
    /// [`Engine::ask_and_wait`]: crate::Engine::ask_and_wait
    pub fn ask_and_wait(
        &mut self,
        request: OutboundFrame,
        expected_ack: u16,
        timeout_ms: u64,
    ) -> Result<bool> {
        self.engine.ask_and_wait(request, expected_ack, timeout_ms)
    }

    /// The deployment's identifier table.
    pub fn layout(&self) -> &CommandLayout {
        self.engine.layout()
    }

    /// The engine's configuration.
    pub fn options(&self) -> &EngineOptions {
        self.engine.options()
    }

    /// The streaming transfer session.
    pub fn session_mut(&mut self) -> &mut TransferSession {
        self.engine.session_mut()
    }

    /// The measurement channel bank.
    pub fn channels_mut(&mut self) -> &mut ChannelBank {
        self.engine.channels_mut()
    }

    /// Read a text bool argument.
    pub fn read_bool(&mut self) -> Result<bool> {
        self.args.read_bool()
    }

    /// Read a text int16 argument.
    pub fn read_i16(&mut self) -> Result<i16> {
        self.args.read_i16()
    }

    /// Read a text int32 argument.
    pub fn read_i32(&mut self) -> Result<i32> {
        self.args.read_i32()
    }

    /// Read a text float argument.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.args.read_f32()
    }

    /// Read a text double argument.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.args.read_f64()
    }

    /// Read a single-byte character argument.
    pub fn read_char(&mut self) -> Result<u8> {
        self.args.read_char()
    }

    /// Read a string argument.
    pub fn read_str(&mut self) -> Result<&'a str> {
        self.args.read_str()
    }

    /// Read a raw byte-span argument.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        self.args.read_bytes()
    }

    /// Read a binary bool argument.
    pub fn read_bin_bool(&mut self) -> Result<bool> {
        self.args.read_bin_bool()
    }

    /// Read a binary int16 argument.
    pub fn read_bin_i16(&mut self) -> Result<i16> {
        self.args.read_bin_i16()
    }

    /// Read a binary int32 argument.
    pub fn read_bin_i32(&mut self) -> Result<i32> {
        self.args.read_bin_i32()
    }

    /// Read a binary float argument.
    pub fn read_bin_f32(&mut self) -> Result<f32> {
        self.args.read_bin_f32()
    }

    /// Read a binary double argument.
    pub fn read_bin_f64(&mut self) -> Result<f64> {
        self.args.read_bin_f64()
    }

    /// Read a binary single-byte character argument.
    pub fn read_bin_char(&mut self) -> Result<u8> {
        self.args.read_bin_char()
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("command_id", &self.command_id)
            .field("remaining_args", &self.args.remaining())
            .finish()
    }
}
