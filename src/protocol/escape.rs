//! Wire punctuation and the escaping rules built on it.
//!
//! A link is configured with three reserved bytes: the field separator,
//! the command separator, and the escape character. Any of the three may
//! appear inside a field value only when preceded by the escape
//! character. Encoding inserts that escape; decoding removes exactly one
//! escape and takes the following byte literally.
//!
//! # Example
//!
//! ```
//! use cmdwire::protocol::{escape, unescape, Punctuation};
//!
//! let punct = Punctuation::default();
//! let escaped = escape(b"a,b;c", punct);
//! assert_eq!(&escaped, b"a/,b/;c");
//! assert_eq!(unescape(&escaped, punct), b"a,b;c");
//! ```

use crate::error::{Error, Result};

/// The three reserved bytes of one link, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Punctuation {
    /// Byte separating fields within a frame.
    pub field_sep: u8,
    /// Byte terminating a frame.
    pub cmd_sep: u8,
    /// Byte suppressing the delimiter meaning of the following byte.
    pub escape: u8,
}

impl Punctuation {
    /// Create a punctuation triple.
    pub fn new(field_sep: u8, cmd_sep: u8, escape: u8) -> Self {
        Self {
            field_sep,
            cmd_sep,
            escape,
        }
    }

    /// True if `byte` is one of the three reserved bytes.
    #[inline]
    pub fn is_reserved(&self, byte: u8) -> bool {
        byte == self.field_sep || byte == self.cmd_sep || byte == self.escape
    }

    /// Check that the three bytes are pairwise distinct.
    pub fn validate(&self) -> Result<()> {
        if self.field_sep == self.cmd_sep
            || self.field_sep == self.escape
            || self.cmd_sep == self.escape
        {
            return Err(Error::InvalidOptions(
                "punctuation bytes must be pairwise distinct".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Punctuation {
    /// The conventional `,` / `;` / `/` triple.
    fn default() -> Self {
        Self::new(b',', b';', b'/')
    }
}

/// Escape `src` into `dst`, prefixing every reserved byte with the
/// escape character.
pub fn escape_into(dst: &mut Vec<u8>, src: &[u8], punct: Punctuation) {
    for &byte in src {
        if punct.is_reserved(byte) {
            dst.push(punct.escape);
        }
        dst.push(byte);
    }
}

/// Escape `src` into a fresh buffer.
pub fn escape(src: &[u8], punct: Punctuation) -> Vec<u8> {
    let mut dst = Vec::with_capacity(src.len());
    escape_into(&mut dst, src, punct);
    dst
}

/// Remove escaping from `src`: each escape character is dropped and the
/// byte after it is taken literally. A trailing lone escape is dropped.
///
/// This mirrors what the incremental tokenizer does while splitting
/// fields; it is exposed for tests and for callers that receive
/// pre-framed data out of band.
pub fn unescape(src: &[u8], punct: Punctuation) -> Vec<u8> {
    let mut dst = Vec::with_capacity(src.len());
    let mut escaped = false;
    for &byte in src {
        if escaped {
            dst.push(byte);
            escaped = false;
        } else if byte == punct.escape {
            escaped = true;
        } else {
            dst.push(byte);
        }
    }
    dst
}
