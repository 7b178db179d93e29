//! Builder for outgoing frames.
//!
//! An [`OutboundFrame`] starts from a command identifier and appends
//! typed arguments in wire order; [`encode`](OutboundFrame::encode)
//! yields the final bytes including the terminating command separator.
//! The builder carries its link's punctuation, so frames can be built
//! detached from the engine and sent later.
//!
//! Text arguments are written raw: numeric forms cannot contain reserved
//! bytes, and [`arg_str`](OutboundFrame::arg_str) trusts the caller the
//! same way the wire contract does. Use
//! [`arg_escaped_str`](OutboundFrame::arg_escaped_str) for text that may
//! contain separators, and note that every binary form escapes reserved
//! bytes itself.
//!
//! # Example
//!
//! ```
//! use cmdwire::protocol::{OutboundFrame, Punctuation};
//!
//! let frame = OutboundFrame::new(2, Punctuation::default()).arg_str("ready");
//! assert_eq!(frame.encode(), b"2,ready;");
//! ```

use super::escape::{escape_into, Punctuation};

/// One outgoing frame under construction.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    punct: Punctuation,
    buf: Vec<u8>,
}

impl OutboundFrame {
    /// Start a frame for `command_id`.
    pub fn new(command_id: u16, punct: Punctuation) -> Self {
        let mut buf = Vec::with_capacity(16);
        buf.extend_from_slice(command_id.to_string().as_bytes());
        Self { punct, buf }
    }

    /// Append a string argument verbatim.
    ///
    /// Reserved bytes are not escaped; a value that may contain them
    /// belongs in [`arg_escaped_str`](Self::arg_escaped_str).
    pub fn arg_str(mut self, value: &str) -> Self {
        self.begin_field();
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Append a string argument with reserved bytes escaped.
    pub fn arg_escaped_str(mut self, value: &str) -> Self {
        self.begin_field();
        let punct = self.punct;
        escape_into(&mut self.buf, value.as_bytes(), punct);
        self
    }

    /// Append a text bool as `"1"` or `"0"`.
    pub fn arg_bool(self, value: bool) -> Self {
        self.arg_str(if value { "1" } else { "0" })
    }

    /// Append a text 16-bit integer.
    pub fn arg_i16(self, value: i16) -> Self {
        self.arg_display(value)
    }

    /// Append a text 32-bit integer.
    pub fn arg_i32(self, value: i32) -> Self {
        self.arg_display(value)
    }

    /// Append a text float in its shortest round-trip form.
    pub fn arg_f32(self, value: f32) -> Self {
        self.arg_display(value)
    }

    /// Append a text float with a fixed number of fraction digits.
    pub fn arg_f32_prec(mut self, value: f32, digits: usize) -> Self {
        self.begin_field();
        self.buf
            .extend_from_slice(format!("{value:.digits$}").as_bytes());
        self
    }

    /// Append a text double in its shortest round-trip form.
    pub fn arg_f64(self, value: f64) -> Self {
        self.arg_display(value)
    }

    /// Append a text double with a fixed number of fraction digits.
    pub fn arg_f64_prec(mut self, value: f64, digits: usize) -> Self {
        self.begin_field();
        self.buf
            .extend_from_slice(format!("{value:.digits$}").as_bytes());
        self
    }

    /// Append a float in scientific notation with `digits` fraction
    /// digits. The interoperability contract uses 2 for floats.
    pub fn arg_sci_f32(mut self, value: f32, digits: usize) -> Self {
        self.begin_field();
        self.buf
            .extend_from_slice(format!("{value:.digits$e}").as_bytes());
        self
    }

    /// Append a double in scientific notation with `digits` fraction
    /// digits. The interoperability contract uses 4 for doubles.
    pub fn arg_sci_f64(mut self, value: f64, digits: usize) -> Self {
        self.begin_field();
        self.buf
            .extend_from_slice(format!("{value:.digits$e}").as_bytes());
        self
    }

    /// Append a single-byte character argument, escaped if reserved.
    pub fn arg_char(mut self, value: u8) -> Self {
        self.begin_field();
        let punct = self.punct;
        escape_into(&mut self.buf, &[value], punct);
        self
    }

    /// Append a binary bool (one byte, 0 or 1).
    pub fn bin_bool(self, value: bool) -> Self {
        self.bin_raw(&[u8::from(value)])
    }

    /// Append a binary little-endian 16-bit integer.
    pub fn bin_i16(self, value: i16) -> Self {
        self.bin_raw(&value.to_le_bytes())
    }

    /// Append a binary little-endian 32-bit integer.
    pub fn bin_i32(self, value: i32) -> Self {
        self.bin_raw(&value.to_le_bytes())
    }

    /// Append a binary IEEE-754 single, little-endian.
    pub fn bin_f32(self, value: f32) -> Self {
        self.bin_raw(&value.to_le_bytes())
    }

    /// Append a binary IEEE-754 double, little-endian.
    pub fn bin_f64(self, value: f64) -> Self {
        self.bin_raw(&value.to_le_bytes())
    }

    /// Append a binary single-byte character.
    pub fn bin_char(self, value: u8) -> Self {
        self.bin_raw(&[value])
    }

    /// Finish the frame, appending the command separator.
    pub fn encode(mut self) -> Vec<u8> {
        self.buf.push(self.punct.cmd_sep);
        self.buf
    }

    fn arg_display<T: std::fmt::Display>(mut self, value: T) -> Self {
        self.begin_field();
        self.buf.extend_from_slice(value.to_string().as_bytes());
        self
    }

    fn bin_raw(mut self, raw: &[u8]) -> Self {
        self.begin_field();
        let punct = self.punct;
        escape_into(&mut self.buf, raw, punct);
        self
    }

    fn begin_field(&mut self) {
        self.buf.push(self.punct.field_sep);
    }
}
