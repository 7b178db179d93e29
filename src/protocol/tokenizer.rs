//! Incremental frame tokenizer.
//!
//! Turns an unreliable byte stream into complete frames, tolerating
//! receipt in arbitrary chunk sizes. Partial state (an open field, the
//! escape flag) persists across calls, so a frame split over any number
//! of reads is reassembled exactly. A frame is only ever emitted once its
//! terminating command separator has been seen with escape state
//! resolved; nothing incomplete escapes this module.
//!
//! Uses `bytes::BytesMut` for the field accumulator; completed fields
//! are frozen to `bytes::Bytes` without copying.
//!
//! # Example
//!
//! ```
//! use cmdwire::protocol::{Punctuation, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new(Punctuation::default());
//!
//! // Bytes arrive in two chunks, splitting the frame mid-field.
//! assert!(tokenizer.feed(b"12,he").is_empty());
//! let frames = tokenizer.feed(b"llo;");
//!
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].command_id(), Some(12));
//! assert_eq!(&frames[0].args()[0][..], b"hello");
//! ```

use bytes::{Bytes, BytesMut};
use tracing::warn;

use super::escape::Punctuation;
use super::Frame;

/// Default cap on the byte length of one pending frame.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024;

/// Escape-aware splitter from bytes to frames.
///
/// One instance carries the in-flight state of exactly one link.
#[derive(Debug)]
pub struct Tokenizer {
    punct: Punctuation,
    /// Accumulator for the field currently being read.
    field: BytesMut,
    /// Completed fields of the open frame.
    fields: Vec<Bytes>,
    /// Set when the previous byte was the escape character.
    escaped: bool,
    /// Unescaped bytes accumulated toward the open frame.
    pending: usize,
    max_frame_len: usize,
}

impl Tokenizer {
    /// Create a tokenizer with the default pending-frame cap.
    pub fn new(punct: Punctuation) -> Self {
        Self::with_max_frame_len(punct, DEFAULT_MAX_FRAME_LEN)
    }

    /// Create a tokenizer with a custom pending-frame cap.
    pub fn with_max_frame_len(punct: Punctuation, max_frame_len: usize) -> Self {
        Self {
            punct,
            field: BytesMut::new(),
            fields: Vec::new(),
            escaped: false,
            pending: 0,
            max_frame_len,
        }
    }

    /// Consume one byte; returns a frame when this byte completed one.
    ///
    /// A frame completes only on an unescaped command separator, so at
    /// most one frame can result from a single byte.
    pub fn accept(&mut self, byte: u8) -> Option<Frame> {
        if self.escaped {
            self.escaped = false;
            self.push_byte(byte);
            return None;
        }
        if byte == self.punct.escape {
            self.escaped = true;
            return None;
        }
        if byte == self.punct.field_sep {
            if self.pending >= self.max_frame_len {
                warn!(
                    max_frame_len = self.max_frame_len,
                    "pending frame exceeded maximum length, discarding"
                );
                self.clear();
                return None;
            }
            self.close_field();
            return None;
        }
        if byte == self.punct.cmd_sep {
            self.close_field();
            let fields = std::mem::take(&mut self.fields);
            self.pending = 0;
            return Some(Frame::new(fields));
        }
        self.push_byte(byte);
        None
    }

    /// Consume a chunk, collecting every frame it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        for &byte in data {
            if let Some(frame) = self.accept(byte) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Unescaped bytes buffered toward the open frame.
    pub fn pending_len(&self) -> usize {
        self.pending
    }

    /// True when no partial frame is buffered.
    pub fn is_idle(&self) -> bool {
        self.pending == 0 && !self.escaped && self.fields.is_empty() && self.field.is_empty()
    }

    /// Drop any partial frame and reset the escape flag.
    pub fn clear(&mut self) {
        self.field.clear();
        self.fields.clear();
        self.escaped = false;
        self.pending = 0;
    }

    fn push_byte(&mut self, byte: u8) {
        if self.pending >= self.max_frame_len {
            warn!(
                max_frame_len = self.max_frame_len,
                "pending frame exceeded maximum length, discarding"
            );
            self.clear();
            return;
        }
        self.field.extend_from_slice(&[byte]);
        self.pending += 1;
    }

    fn close_field(&mut self) {
        let field = std::mem::take(&mut self.field).freeze();
        self.fields.push(field);
        // The separator itself counts toward the frame cap.
        self.pending += 1;
    }
}
