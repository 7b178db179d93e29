//! # cmdwire
//!
//! Engine for the comma-and-semicolon command protocol spoken by serial
//! instrument firmware.
//!
//! Frames are text on the outside and optionally binary on the inside:
//! field 0 is a decimal command identifier, further fields carry typed
//! arguments, and an escape byte lets raw binary spans travel inside
//! text framing. The engine tokenizes input byte by byte, routes each
//! completed frame to its handler, answers the shared control table out
//! of the box, and drives everything from a single `pump` loop.
//!
//! ## Architecture
//!
//! - **Protocol**: punctuation, tokenizer, typed argument reader and
//!   frame builder, identifier layout
//! - **Engine**: poll loop, dispatch, synchronous exchange
//! - **Control plane**: built-in handlers for handshake, channel value
//!   requests, value echoes, and series transfers
//! - **Transport**: serial port for deployments, in-memory loopback for
//!   tests
//!
//! ## Example
//!
//! ```
//! use cmdwire::{Context, Engine, LoopbackTransport, Transport};
//!
//! let (side, mut peer) = LoopbackTransport::pair();
//! let mut engine = Engine::builder()
//!     .transport(side)
//!     .handle(25, |ctx: &mut Context| {
//!         let value = ctx.read_i16()?;
//!         let reply = ctx.frame(26).arg_i16(value.saturating_mul(2));
//!         ctx.reply(reply)
//!     })
//!     .build()
//!     .unwrap();
//!
//! peer.write_all(b"25,21;").unwrap();
//! engine.pump().unwrap();
//!
//! let mut buf = [0u8; 32];
//! let n = peer.read_available(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"26,42;");
//!
//! // Extremes clamp instead of overflowing.
//! peer.write_all(b"25,20000;").unwrap();
//! engine.pump().unwrap();
//! let n = peer.read_available(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"26,32767;");
//! ```

pub mod channels;
pub mod clock;
pub mod control;
pub mod error;
pub mod handler;
pub mod options;
pub mod protocol;
pub mod session;
pub mod transport;

mod engine;

pub use channels::{ChannelKind, ValueSource};
pub use control::PingKind;
pub use engine::{Engine, EngineBuilder};
pub use error::{Error, Result};
pub use handler::{CommandHandler, Context};
pub use options::{ChannelConfig, EngineOptions};
pub use protocol::{CommandLayout, ControlSlot, OutboundFrame};
pub use session::{SendOutcome, SessionState};
pub use transport::{LoopbackTransport, SerialTransport, Transport};
