//! Typed value echo handlers.
//!
//! The echo contract exercises every argument form in both directions:
//! the request names a kind, carries one value in that form, and the
//! reply returns the value in the same form. A second request carries
//! three binary values at once. Together they pin down text formatting,
//! scientific notation digit counts, and binary escaping against a
//! reference peer.

use crate::error::{Error, Result};
use crate::handler::Context;
use crate::protocol::ControlSlot;

/// Fraction digits of the scientific float form.
const FLOAT_SCI_DIGITS: usize = 2;
/// Fraction digits of the scientific double form.
const DOUBLE_SCI_DIGITS: usize = 4;

/// Argument forms of the echo contract, in wire order of the kind
/// selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingKind {
    /// Text bool, `"0"` or `"1"`.
    Bool,
    /// Text 16-bit integer.
    Int16,
    /// Text 32-bit integer.
    Int32,
    /// Text float, shortest form.
    Float,
    /// Text float, scientific notation with 2 fraction digits.
    FloatSci,
    /// Text double, shortest form.
    Double,
    /// Text double, scientific notation with 4 fraction digits.
    DoubleSci,
    /// Single-byte character.
    Char,
    /// String written verbatim.
    String,
    /// Binary bool.
    BinBool,
    /// Binary little-endian 16-bit integer.
    BinInt16,
    /// Binary little-endian 32-bit integer.
    BinInt32,
    /// Binary IEEE-754 single.
    BinFloat,
    /// Binary IEEE-754 double.
    BinDouble,
    /// Binary single-byte character.
    BinChar,
    /// String with reserved bytes escaped.
    EscapedString,
}

impl PingKind {
    /// Decode a kind selector, if it names a known form.
    pub fn from_i16(value: i16) -> Option<Self> {
        Some(match value {
            0 => PingKind::Bool,
            1 => PingKind::Int16,
            2 => PingKind::Int32,
            3 => PingKind::Float,
            4 => PingKind::FloatSci,
            5 => PingKind::Double,
            6 => PingKind::DoubleSci,
            7 => PingKind::Char,
            8 => PingKind::String,
            9 => PingKind::BinBool,
            10 => PingKind::BinInt16,
            11 => PingKind::BinInt32,
            12 => PingKind::BinFloat,
            13 => PingKind::BinDouble,
            14 => PingKind::BinChar,
            15 => PingKind::EscapedString,
            _ => return None,
        })
    }

    /// Wire value of this kind's selector.
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// Echo one value back in the form its kind selector names.
pub(super) fn on_value_ping(ctx: &mut Context) -> Result<()> {
    let selector = ctx.read_i16()?;
    let kind = PingKind::from_i16(selector).ok_or(Error::MalformedArgument {
        index: 0,
        expected: "ping kind",
    })?;

    let pong = ctx.control_frame(ControlSlot::ValuePong);
    let pong = match kind {
        PingKind::Bool => pong.arg_bool(ctx.read_bool()?),
        PingKind::Int16 => pong.arg_i16(ctx.read_i16()?),
        PingKind::Int32 => pong.arg_i32(ctx.read_i32()?),
        PingKind::Float => pong.arg_f32(ctx.read_f32()?),
        PingKind::FloatSci => pong.arg_sci_f32(ctx.read_f32()?, FLOAT_SCI_DIGITS),
        PingKind::Double => pong.arg_f64(ctx.read_f64()?),
        PingKind::DoubleSci => pong.arg_sci_f64(ctx.read_f64()?, DOUBLE_SCI_DIGITS),
        PingKind::Char => pong.arg_char(ctx.read_char()?),
        PingKind::String => pong.arg_str(ctx.read_str()?),
        PingKind::BinBool => pong.bin_bool(ctx.read_bin_bool()?),
        PingKind::BinInt16 => pong.bin_i16(ctx.read_bin_i16()?),
        PingKind::BinInt32 => pong.bin_i32(ctx.read_bin_i32()?),
        PingKind::BinFloat => pong.bin_f32(ctx.read_bin_f32()?),
        PingKind::BinDouble => pong.bin_f64(ctx.read_bin_f64()?),
        PingKind::BinChar => pong.bin_char(ctx.read_bin_char()?),
        PingKind::EscapedString => pong.arg_escaped_str(ctx.read_str()?),
    };
    ctx.reply(pong)
}

/// Echo three binary values back in one frame.
pub(super) fn on_multi_value_ping(ctx: &mut Context) -> Result<()> {
    let first = ctx.read_bin_i16()?;
    let second = ctx.read_bin_i32()?;
    let third = ctx.read_bin_f64()?;

    let pong = ctx
        .control_frame(ControlSlot::MultiValuePong)
        .bin_i16(first)
        .bin_i32(second)
        .bin_f64(third);
    ctx.reply(pong)
}
