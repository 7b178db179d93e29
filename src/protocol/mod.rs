//! Protocol module - punctuation, framing, and typed arguments.
//!
//! This module implements the text/binary hybrid wire protocol:
//! - Escaping rules over the link's reserved punctuation bytes
//! - Incremental tokenizer turning a byte stream into complete frames
//! - Frame struct with the positional argument reader
//! - Outbound frame builder with typed text and binary argument forms
//! - Command identifier layout shared across both endpoints

mod args;
mod commands;
mod escape;
mod frame;
mod outbound;
mod tokenizer;

pub use args::ArgReader;
pub use commands::{CommandLayout, ControlSlot};
pub use escape::{escape, escape_into, unescape, Punctuation};
pub use frame::Frame;
pub use outbound::OutboundFrame;
pub use tokenizer::{Tokenizer, DEFAULT_MAX_FRAME_LEN};
