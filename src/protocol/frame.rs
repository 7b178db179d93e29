//! Decoded frame with typed field access.
//!
//! A frame is an ordered sequence of fields. Field 0 carries the command
//! identifier in ASCII decimal; the remaining fields are arguments whose
//! meaning is positional. Fields are stored as `bytes::Bytes`, already
//! unescaped by the tokenizer, so binary argument payloads arrive here as
//! their raw bytes.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use cmdwire::protocol::Frame;
//!
//! let frame = Frame::new(vec![
//!     Bytes::from_static(b"12"),
//!     Bytes::from_static(b"hello"),
//! ]);
//!
//! assert_eq!(frame.command_id(), Some(12));
//! assert_eq!(frame.args().len(), 1);
//! ```

use bytes::Bytes;

use super::args::ArgReader;

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    fields: Vec<Bytes>,
}

impl Frame {
    /// Create a frame from its decoded fields.
    pub fn new(fields: Vec<Bytes>) -> Self {
        Self { fields }
    }

    /// Parse field 0 as the command identifier.
    ///
    /// Returns `None` when the frame has no fields or field 0 is not an
    /// ASCII decimal `u16`; the dispatcher routes such frames through the
    /// fallback handler.
    pub fn command_id(&self) -> Option<u16> {
        let head = self.fields.first()?;
        std::str::from_utf8(head).ok()?.parse::<u16>().ok()
    }

    /// All fields including the identifier field.
    #[inline]
    pub fn fields(&self) -> &[Bytes] {
        &self.fields
    }

    /// The argument fields (everything after field 0).
    #[inline]
    pub fn args(&self) -> &[Bytes] {
        self.fields.get(1..).unwrap_or(&[])
    }

    /// Number of fields including the identifier field.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Positional typed cursor over the argument fields.
    pub fn reader(&self) -> ArgReader<'_> {
        ArgReader::new(self)
    }
}
